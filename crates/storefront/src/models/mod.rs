//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartItem;
pub use order::{LineItem, Order};
pub use product::Product;
pub use session::{CurrentUser, SESSION_COOKIE_NAME, SessionToken};
pub use user::User;
