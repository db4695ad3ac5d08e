//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /               - Product listing and current user
//! POST /               - Same as GET
//!
//! # Products
//! GET  /product/{id}   - Product detail
//! POST /product/{id}   - Add to cart (requires auth), redirects to /
//!
//! # Auth
//! GET  /login/         - Login page
//! POST /login/         - Login action, sets the session cookie
//!
//! # Cart (requires auth)
//! GET  /cart/          - Cart contents and order history
//! POST /cart/          - Check out, redirects to /
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index).post(home::index))
        .route("/product/{id}", get(products::show).post(products::add_to_cart))
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/cart/", get(cart::show).post(cart::checkout))
}
