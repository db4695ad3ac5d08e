//! Cart domain types.

use cafego_core::{CartItemId, Price, ProductId, Quantity, UserId};

/// A pending quantity of a product in a user's cart, joined with the
/// catalog for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Cart row ID.
    pub id: CartItemId,
    /// Owner of the cart.
    pub user_id: UserId,
    /// Product being bought.
    pub product_id: ProductId,
    /// Number of units (always positive).
    pub quantity: Quantity,
    /// Product name from the catalog.
    pub product_name: String,
    /// Current catalog price of one unit.
    pub unit_price: Price,
}

impl CartItem {
    /// Price of this row (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Sum of all cart rows.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}
