//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

use cafego_storefront::config;

/// Resolve the storefront database URL the same way the server does.
fn database_url() -> SecretString {
    dotenvy::dotenv().ok();
    config::database_url_from_env()
}
