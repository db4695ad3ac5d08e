//! Seed the storefront database from a YAML file.
//!
//! See [`cafego_storefront::db::seed`] for the file format. Migrations are
//! applied first so a fresh database can be seeded in one step.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use cafego_storefront::db::{self, RepositoryError, seed::SeedData};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not valid YAML or has the wrong shape.
    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Inserting a row failed.
    #[error("Seeding failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Parse a seed document.
///
/// # Errors
///
/// Returns `SeedError::Parse` if the YAML is malformed or a value is invalid
/// (for example a negative price).
pub fn parse(content: &str) -> Result<SeedData, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Seed users and products from `path`.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, or if the
/// database cannot be prepared or written.
pub async fn from_file(path: &Path) -> Result<(), SeedError> {
    info!(path = %path.display(), "Loading seed data from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let data = parse(&content)?;

    info!(
        users = data.users.len(),
        products = data.products.len(),
        "Parsed seed file"
    );

    let pool = db::create_pool(&super::database_url()).await?;
    db::run_migrations(&pool).await?;

    let summary = db::seed::apply(&pool, &data).await?;

    info!("Seeding complete!");
    info!("  Users inserted: {}", summary.users_inserted);
    info!("  Users skipped (already exist): {}", summary.users_skipped);
    info!("  Products inserted: {}", summary.products_inserted);
    info!("  Products skipped (already exist): {}", summary.products_skipped);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_seed_file() {
        let data = parse(include_str!("../../seed/demo.yaml")).unwrap();

        let alice = data.users.iter().find(|u| u.username == "alice").unwrap();
        assert_eq!(alice.password, "pw1");
        assert!(
            data.products
                .iter()
                .any(|p| p.id.is_some_and(|id| id.as_i64() == 3))
        );
    }

    #[test]
    fn test_parse_rejects_fractional_cents() {
        let yaml = "products:\n  - name: Oddity\n    price: \"1.005\"\n";
        assert!(matches!(parse(yaml), Err(SeedError::Parse(_))));
    }

    #[test]
    fn test_parse_empty_document_sections_default() {
        let data = parse("users: []\n").unwrap();
        assert!(data.users.is_empty());
        assert!(data.products.is_empty());
    }

    #[tokio::test]
    async fn test_from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = from_file(&missing).await.unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
