//! Cafego CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! cafego-cli migrate
//!
//! # Load users and products from a YAML file
//! cafego-cli seed --file crates/cli/seed/demo.yaml
//! ```
//!
//! Both commands read `CAFEGO_DATABASE_URL` (falling back to `DATABASE_URL`,
//! then `sqlite://cafego.db?mode=rwc`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cafego-cli")]
#[command(author, version, about = "Cafego CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Load users and products from a YAML seed file
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file } => commands::seed::from_file(&file).await?,
    }
    Ok(())
}
