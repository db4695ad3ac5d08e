//! Authentication extractors and the session cookie.
//!
//! The caller's identity is resolved from the `cafego_session` cookie through
//! the [`SessionStore`](crate::services::SessionStore) held in [`AppState`].

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::{CurrentUser, SESSION_COOKIE_NAME, SessionToken};
use crate::state::AppState;

/// Where anonymous callers of protected pages are sent.
pub const LOGIN_PATH: &str = "/login/";

/// Extractor that requires a logged-in user.
///
/// If the caller has no valid session, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
#[derive(Debug)]
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = RedirectToLogin;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(OptionalAuth(user)) = OptionalAuth::from_request_parts(parts, state).await;

        user.map(Self).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "Anonymous request to protected page");
            RedirectToLogin
        })
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// logged in. A missing, unknown or malformed cookie all mean anonymous.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| SessionToken::from_cookie_value(c.value()));

        Ok(Self(state.sessions().get(token.as_ref()).await))
    }
}

/// Build the session cookie carrying `token`.
///
/// `HttpOnly`, `SameSite=Lax`, path `/`, no expiry. `Secure` is set only
/// when `secure` is true (i.e. when served over HTTPS).
#[must_use]
pub fn session_cookie(token: &SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let token = SessionToken::from_cookie_value("dG9rZW4tZm9yLXRlc3Rpbmc=");
        let cookie = session_cookie(&token, false);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "dG9rZW4tZm9yLXRlc3Rpbmc=");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert!(cookie.max_age().is_none());
    }

    #[test]
    fn test_secure_flag_follows_config() {
        let cookie = session_cookie(&SessionToken::generate(), true);
        assert_eq!(cookie.secure(), Some(true));
    }
}
