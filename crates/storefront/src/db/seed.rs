//! Load users and catalog entries from a seed document.
//!
//! Users and products are never created by the web server; they come from
//! here. The document format (YAML via the CLI) is:
//!
//! ```yaml
//! users:
//!   - username: alice
//!     password: pw1
//!     display_name: Alice
//! products:
//!   - id: 1
//!     name: Espresso
//!     price: "3.00"
//!     description: A short, strong shot.
//! ```
//!
//! Seeding is additive: a username or product ID that already exists is
//! skipped and counted, never overwritten.

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use cafego_core::{Price, ProductId};

use super::{ProductRepository, RepositoryError, UserRepository};

/// A user entry in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// A catalog entry in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    /// Fixed product ID; assigned by the database when omitted.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

/// Full seed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// Result of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users_inserted: u64,
    pub users_skipped: u64,
    pub products_inserted: u64,
    pub products_skipped: u64,
}

/// Insert everything in `data` that is not already present.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails for any reason
/// other than the row already existing.
#[instrument(skip(pool, data), fields(users = data.users.len(), products = data.products.len()))]
pub async fn apply(pool: &SqlitePool, data: &SeedData) -> Result<SeedSummary, RepositoryError> {
    let mut summary = SeedSummary::default();

    let users = UserRepository::new(pool);
    for seed in &data.users {
        match users
            .create(&seed.username, &seed.password, &seed.display_name)
            .await
        {
            Ok(user) => {
                debug!(user_id = %user.id, username = %user.username, "Seeded user");
                summary.users_inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                debug!(username = %seed.username, "User already exists, skipping");
                summary.users_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let products = ProductRepository::new(pool);
    for seed in &data.products {
        match products
            .create(seed.id, &seed.name, seed.price, &seed.description)
            .await
        {
            Ok(product) => {
                debug!(product_id = %product.id, name = %product.name, "Seeded product");
                summary.products_inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                debug!(name = %seed.name, "Product ID already taken, skipping");
                summary.products_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        users_inserted = summary.users_inserted,
        users_skipped = summary.users_skipped,
        products_inserted = summary.products_inserted,
        products_skipped = summary.products_skipped,
        "Seeding complete"
    );

    Ok(summary)
}
