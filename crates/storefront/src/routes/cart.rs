//! Cart and checkout route handlers.
//!
//! Both routes require a logged-in user; anonymous callers are redirected to
//! the login page by [`RequireAuth`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::{CartService, CartView};
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub user: Option<CurrentUser>,
    pub cart: CartView,
}

/// Display the cart, its subtotal and previous orders.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartTemplate> {
    let cart = CartService::new(state.pool()).view(user.id).await?;

    Ok(CartTemplate {
        user: Some(user),
        cart,
    })
}

/// Check out the cart and return to the home page.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    CartService::new(state.pool()).checkout(user.id).await?;

    Ok(Redirect::to("/"))
}
