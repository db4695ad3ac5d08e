//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Username/password login and session issuance
//! - `cart` - Adding to the cart, viewing it, and checkout
//! - `session` - In-memory session token store

pub mod auth;
pub mod cart;
pub mod session;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, CartView};
pub use session::SessionStore;
