//! Catalog repository.

use sqlx::SqlitePool;

use cafego_core::{Price, ProductId};

use super::{RepositoryError, map_unique_violation};
use crate::models::Product;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price_cents: i64,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            price: Price::from_cents(r.price_cents),
            description: r.description,
        }
    }
}

/// Repository for catalog reads (and seeding).
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price_cents, description
            FROM cgo_product
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price_cents, description
            FROM cgo_product
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a catalog entry. With `id: None` the database assigns one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        id: Option<ProductId>,
        name: &str,
        price: Price,
        description: &str,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO cgo_product (id, name, price_cents, description)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, price_cents, description
            ",
        )
        .bind(id)
        .bind(name)
        .bind(price.cents())
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product id"))?;

        Ok(Product::from(row))
    }
}
