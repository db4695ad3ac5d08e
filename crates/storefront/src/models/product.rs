//! Catalog product.

use cafego_core::{Price, ProductId};

/// A read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
}
