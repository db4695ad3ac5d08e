//! Database operations for the storefront `SQLite` store.
//!
//! ## Tables
//!
//! - `cgo_user` - Shop users (seeded out-of-band)
//! - `cgo_product` - Read-only catalog
//! - `cgo_cart_item` - Pending cart rows, one per "add to cart"
//! - `cgo_transaction` - Orders created at checkout
//! - `cgo_line_item` - Order rows, one per cart row at checkout
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/`, embedded at
//! compile time, and run on server startup or via:
//! ```bash
//! cargo run -p cafego-cli -- migrate
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique username) or a concurrent change.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint failure to `RepositoryError::Conflict`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create an `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enforced on every connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .foreign_keys(true)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a single-connection in-memory pool.
///
/// An in-memory `SQLite` database lives and dies with its connection, so the
/// pool is pinned to exactly one connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be opened.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Run the embedded storefront migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// recorded migration history does not match the embedded set.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for repository and service tests.

    use cafego_core::{Price, ProductId};
    use sqlx::SqlitePool;

    use super::{ProductRepository, UserRepository};
    use crate::models::{Product, User};

    /// Fresh migrated in-memory database.
    pub async fn pool() -> SqlitePool {
        let pool = super::create_memory_pool()
            .await
            .expect("in-memory pool should open");
        super::run_migrations(&pool)
            .await
            .expect("migrations should apply");
        pool
    }

    pub async fn user(pool: &SqlitePool, username: &str, password: &str) -> User {
        UserRepository::new(pool)
            .create(username, password, &username.to_uppercase())
            .await
            .expect("user insert should succeed")
    }

    pub async fn product(pool: &SqlitePool, id: i64, name: &str, cents: i64) -> Product {
        ProductRepository::new(pool)
            .create(
                Some(ProductId::new(id)),
                name,
                Price::from_cents(cents),
                "test product",
            )
            .await
            .expect("product insert should succeed")
    }
}
