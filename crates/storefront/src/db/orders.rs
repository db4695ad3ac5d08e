//! Order repository: checkout and order history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use cafego_core::{LineItemId, OrderId, Price, ProductId, Quantity, UserId};

use super::{RepositoryError, cart};
use crate::models::{LineItem, Order};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: LineItemId,
    transaction_id: OrderId,
    product_id: ProductId,
    product_name: String,
    #[sqlx(try_from = "i64")]
    quantity: Quantity,
    unit_price_cents: i64,
}

impl From<LineItemRow> for LineItem {
    fn from(r: LineItemRow) -> Self {
        Self {
            id: r.id,
            order_id: r.transaction_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: Price::from_cents(r.unit_price_cents),
        }
    }
}

/// Repository for orders ("transactions") and their line items.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order and clear the cart.
    ///
    /// Reads the cart, inserts the order row, inserts one line item per cart
    /// row and deletes the cart rows, all in one transaction. Any failure
    /// rolls the whole checkout back.
    ///
    /// Returns `None` without writing anything when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart changed while the
    /// checkout was running.
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn checkout(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let items = cart::fetch_for_user(&mut *tx, user_id).await?;
        if items.is_empty() {
            return Ok(None);
        }

        let order = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO cgo_transaction (user_id, created_at)
            VALUES (?, ?)
            RETURNING id, user_id, created_at
            ",
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut line_items = Vec::with_capacity(items.len());
        for item in items {
            let id = sqlx::query_scalar::<_, LineItemId>(
                r"
                INSERT INTO cgo_line_item (transaction_id, product_id, quantity, unit_price_cents)
                VALUES (?, ?, ?, ?)
                RETURNING id
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price.cents())
            .fetch_one(&mut *tx)
            .await?;

            line_items.push(LineItem {
                id,
                order_id: order.id,
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }

        let removed = cart::delete_for_user(&mut *tx, user_id).await?;
        if usize::try_from(removed).ok() != Some(line_items.len()) {
            return Err(RepositoryError::Conflict(format!(
                "cart changed during checkout: expected {} rows, removed {removed}",
                line_items.len()
            )));
        }

        tx.commit().await?;

        Ok(Some(Order {
            id: order.id,
            user_id: order.user_id,
            created_at: order.created_at,
            line_items,
        }))
    }

    /// List a user's orders, newest first, each with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, created_at
            FROM cgo_transaction
            WHERE user_id = ?
            ORDER BY id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, LineItemRow>(
            r"
            SELECT li.id,
                   li.transaction_id,
                   li.product_id,
                   p.name AS product_name,
                   li.quantity,
                   li.unit_price_cents
            FROM cgo_line_item li
            JOIN cgo_transaction t ON t.id = li.transaction_id
            JOIN cgo_product p ON p.id = li.product_id
            WHERE t.user_id = ?
            ORDER BY li.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<LineItem>> = HashMap::new();
        for row in rows {
            by_order
                .entry(row.transaction_id)
                .or_default()
                .push(LineItem::from(row));
        }

        Ok(orders
            .into_iter()
            .map(|o| Order {
                line_items: by_order.remove(&o.id).unwrap_or_default(),
                id: o.id,
                user_id: o.user_id,
                created_at: o.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::CartRepository;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_checkout_moves_cart_into_order() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        test_support::product(&pool, 2, "Croissant", 275).await;
        let cart = CartRepository::new(&pool);
        cart.add_item(alice.id, ProductId::new(1), Quantity::new(2).unwrap())
            .await
            .unwrap();
        cart.add_item(alice.id, ProductId::new(2), Quantity::new(1).unwrap())
            .await
            .unwrap();

        let order = OrderRepository::new(&pool)
            .checkout(alice.id)
            .await
            .unwrap()
            .unwrap();

        let pairs: Vec<_> = order
            .line_items
            .iter()
            .map(|li| (li.product_id.as_i64(), li.quantity.get()))
            .collect();
        assert_eq!(pairs, [(1, 2), (2, 1)]);
        assert_eq!(order.total().to_string(), "$8.75");
        assert!(cart.list_for_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_creates_nothing() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        let repo = OrderRepository::new(&pool);

        assert!(repo.checkout(alice.id).await.unwrap().is_none());
        assert!(repo.list_for_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_leaves_other_carts_alone() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        let bob = test_support::user(&pool, "bob", "pw2").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        let cart = CartRepository::new(&pool);
        let one = Quantity::new(1).unwrap();
        cart.add_item(alice.id, ProductId::new(1), one).await.unwrap();
        cart.add_item(bob.id, ProductId::new(1), one).await.unwrap();

        OrderRepository::new(&pool).checkout(alice.id).await.unwrap();

        assert_eq!(cart.list_for_user(bob.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_user_returns_newest_first_with_items() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        test_support::product(&pool, 3, "Flat White", 450).await;
        let cart = CartRepository::new(&pool);
        let orders = OrderRepository::new(&pool);

        cart.add_item(alice.id, ProductId::new(1), Quantity::new(1).unwrap())
            .await
            .unwrap();
        let first = orders.checkout(alice.id).await.unwrap().unwrap();
        cart.add_item(alice.id, ProductId::new(3), Quantity::new(2).unwrap())
            .await
            .unwrap();
        let second = orders.checkout(alice.id).await.unwrap().unwrap();

        let history = orders.list_for_user(alice.id).await.unwrap();
        assert_eq!(history, [second, first]);
        let latest = history.first().unwrap();
        assert_eq!(latest.line_items.len(), 1);
        assert_eq!(latest.line_items.first().unwrap().product_name, "Flat White");
    }

    #[tokio::test]
    async fn test_line_items_keep_price_at_checkout() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        CartRepository::new(&pool)
            .add_item(alice.id, ProductId::new(1), Quantity::new(1).unwrap())
            .await
            .unwrap();
        OrderRepository::new(&pool).checkout(alice.id).await.unwrap();

        sqlx::query("UPDATE cgo_product SET price_cents = 999 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let history = OrderRepository::new(&pool)
            .list_for_user(alice.id)
            .await
            .unwrap();
        assert_eq!(history.first().unwrap().total().to_string(), "$3.00");
    }

    #[tokio::test]
    async fn test_failed_line_item_rolls_back_whole_checkout() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        test_support::product(&pool, 1, "Espresso", 300).await;
        test_support::product(&pool, 2, "Croissant", 275).await;
        let cart = CartRepository::new(&pool);
        cart.add_item(alice.id, ProductId::new(1), Quantity::new(2).unwrap())
            .await
            .unwrap();
        cart.add_item(alice.id, ProductId::new(2), Quantity::new(1).unwrap())
            .await
            .unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_croissant BEFORE INSERT ON cgo_line_item \
             WHEN NEW.product_id = 2 \
             BEGIN SELECT RAISE(ABORT, 'croissants unavailable'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = OrderRepository::new(&pool).checkout(alice.id).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));

        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cgo_transaction")
            .fetch_one(&pool)
            .await
            .unwrap();
        let line_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cgo_line_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((orders, line_items), (0, 0));
        assert_eq!(cart.list_for_user(alice.id).await.unwrap().len(), 2);
    }
}
