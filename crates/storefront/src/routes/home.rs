//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Product};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Option<CurrentUser>,
    pub products: Vec<Product>,
}

/// List the catalog and greet the current user, if any.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<IndexTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(IndexTemplate { user, products })
}
