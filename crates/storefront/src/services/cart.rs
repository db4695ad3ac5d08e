//! Cart and checkout service.
//!
//! Ties the catalog, cart rows and orders together for the cart routes.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument};

use cafego_core::{CartItemId, Price, ProductId, Quantity, UserId};

use crate::db::{CartRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::models::cart::subtotal;
use crate::models::{CartItem, Order};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Everything the cart page shows.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    /// Previous orders, newest first.
    pub orders: Vec<Order>,
}

/// Cart service.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
    cart: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            cart: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Add `quantity` of a catalog product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    /// Returns `CartError::Repository` if the insert fails.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, CartError> {
        if self.products.get_by_id(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        let id = self.cart.add_item(user_id, product_id, quantity).await?;
        info!(cart_item_id = %id, quantity = quantity.get(), "Added to cart");
        Ok(id)
    }

    /// Current cart rows, their subtotal, and the order history.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn view(&self, user_id: UserId) -> Result<CartView, CartError> {
        let items = self.cart.list_for_user(user_id).await?;
        let orders = self.orders.list_for_user(user_id).await?;

        Ok(CartView {
            subtotal: subtotal(&items),
            items,
            orders,
        })
    }

    /// Turn the cart into an order. `None` if the cart was empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the checkout transaction fails;
    /// nothing is written in that case.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn checkout(&self, user_id: UserId) -> Result<Option<Order>, CartError> {
        let order = self.orders.checkout(user_id).await?;

        match &order {
            Some(order) => info!(
                order_id = %order.id,
                line_items = order.line_items.len(),
                total = %order.total(),
                "Checked out"
            ),
            None => info!("Checkout with empty cart, nothing to do"),
        }

        Ok(order)
    }
}
