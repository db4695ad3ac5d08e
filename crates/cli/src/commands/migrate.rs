//! Database migration command.
//!
//! Applies the migrations embedded in the storefront crate
//! (`crates/storefront/migrations/`). Already-applied migrations are skipped,
//! so running it repeatedly is harmless.

use thiserror::Error;

use cafego_storefront::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed or the history does not match.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database cannot be opened or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let database_url = super::database_url();

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
