//! Cart repository.
//!
//! Every "add to cart" inserts a new row; rows for the same product are
//! listed separately and never merged.

use sqlx::{Sqlite, SqliteExecutor, SqlitePool};

use cafego_core::{CartItemId, Price, ProductId, Quantity, UserId};

use super::RepositoryError;
use crate::models::CartItem;

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    #[sqlx(try_from = "i64")]
    quantity: Quantity,
    product_name: String,
    price_cents: i64,
}

impl From<CartItemRow> for CartItem {
    fn from(r: CartItemRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            quantity: r.quantity,
            product_name: r.product_name,
            unit_price: Price::from_cents(r.price_cents),
        }
    }
}

/// Repository for cart rows.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a cart row for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign key violation for an unknown user or product).
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, CartItemId>(
            r"
            INSERT INTO cgo_cart_item (user_id, product_id, quantity)
            VALUES (?, ?, ?)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(i64::from(quantity))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// List a user's cart rows in insertion order, joined with the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        fetch_for_user(self.pool, user_id).await
    }
}

/// Cart rows for a user on any executor (pool or open transaction).
pub(crate) async fn fetch_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<CartItem>, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<Sqlite, CartItemRow>(
        r"
        SELECT ci.id,
               ci.user_id,
               ci.product_id,
               ci.quantity,
               p.name        AS product_name,
               p.price_cents AS price_cents
        FROM cgo_cart_item ci
        JOIN cgo_product p ON p.id = ci.product_id
        WHERE ci.user_id = ?
        ORDER BY ci.id ASC
        ",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(CartItem::from).collect())
}

/// Delete every cart row of a user, returning how many were removed.
pub(crate) async fn delete_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<u64, RepositoryError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM cgo_cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_add_then_list_contains_item() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 3, "Flat White", 450).await;
        let repo = CartRepository::new(&pool);

        repo.add_item(alice.id, ProductId::new(3), Quantity::new(2).unwrap())
            .await
            .unwrap();

        let items = repo.list_for_user(alice.id).await.unwrap();
        assert_eq!(items.len(), 1);
        let item = items.first().unwrap();
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.product_name, "Flat White");
        assert_eq!(item.line_total().to_string(), "$9.00");
    }

    #[tokio::test]
    async fn test_repeated_adds_are_not_merged() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        let repo = CartRepository::new(&pool);
        let one = Quantity::new(1).unwrap();

        let first = repo.add_item(alice.id, ProductId::new(1), one).await.unwrap();
        let second = repo.add_item(alice.id, ProductId::new(1), one).await.unwrap();
        assert_ne!(first, second);

        let items = repo.list_for_user(alice.id).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        let bob = test_support::user(&pool, "bob", "pw2").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        let repo = CartRepository::new(&pool);

        repo.add_item(alice.id, ProductId::new(1), Quantity::new(1).unwrap())
            .await
            .unwrap();

        assert!(repo.list_for_user(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected_by_foreign_key() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;

        let result = CartRepository::new(&pool)
            .add_item(alice.id, ProductId::new(404), Quantity::new(1).unwrap())
            .await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_delete_for_user() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        let repo = CartRepository::new(&pool);
        let one = Quantity::new(1).unwrap();
        repo.add_item(alice.id, ProductId::new(1), one).await.unwrap();
        repo.add_item(alice.id, ProductId::new(1), one).await.unwrap();

        let removed = delete_for_user(&pool, alice.id).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.list_for_user(alice.id).await.unwrap().is_empty());
    }
}
