//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use cafego_core::{ProductId, Quantity};

use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{CurrentUser, Product};
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart form data.
///
/// Fields are taken as text so that missing or non-numeric values are
/// reported as 400 rather than a form rejection.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub user: Option<CurrentUser>,
    pub product: Product,
}

/// Display a single product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Result<ProductTemplate> {
    let id: ProductId = id.parse()?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductTemplate { user, product })
}

/// Add a product to the caller's cart.
///
/// The product comes from the `product_id` form field; the path segment
/// only has to be a valid ID.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    id.parse::<ProductId>()?;
    let product_id: ProductId = form.product_id.parse()?;
    let quantity = Quantity::parse(&form.quantity)?;

    CartService::new(state.pool())
        .add_to_cart(user.id, product_id, quantity)
        .await?;

    let product_id = product_id.to_string();
    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
    );

    Ok(Redirect::to("/"))
}
