//! Login route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, session_cookie};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Message shown when the username or password is wrong.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid login. Please go back and try again.";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<&'static str>,
}

/// Display the login page.
pub async fn login_page(OptionalAuth(user): OptionalAuth) -> LoginTemplate {
    LoginTemplate { user, error: None }
}

/// Handle login form submission.
///
/// On success the session cookie is set and the caller is sent to `/`.
/// On failure the login page is shown again with 401 and no session exists.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool(), state.sessions());

    match auth.login(&form.username, &form.password).await {
        Ok((token, user)) => {
            set_sentry_user(&user.id, &user.username);
            let jar = jar.add(session_cookie(&token, state.config().secure_cookies));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                user: None,
                error: Some(LOGIN_FAILED_MESSAGE),
            },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
