//! Order ("transaction") domain types.
//!
//! Orders and their line items are append-only; they are written once at
//! checkout and never modified.

use chrono::{DateTime, Utc};

use cafego_core::{LineItemId, OrderId, Price, ProductId, Quantity, UserId};

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Total amount charged for this order.
    #[must_use]
    pub fn total(&self) -> Price {
        self.line_items.iter().map(LineItem::line_total).sum()
    }
}

/// One product row of an order, with the unit price captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}
