//! Integration tests for Cafego.
//!
//! Each test builds its own [`TestContext`]: a fresh in-memory `SQLite`
//! database with migrations applied and demo data seeded, wrapped in the
//! real storefront router. Requests are driven in-process with
//! `tower::ServiceExt::oneshot`, so no server or network is needed.
//!
//! ```bash
//! cargo test -p cafego-integration-tests
//! ```

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use axum_extra::extract::cookie::Cookie;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cafego_core::{Price, ProductId, UserId};
use cafego_storefront::config::StorefrontConfig;
use cafego_storefront::db::{
    self, UserRepository,
    seed::{SeedData, SeedProduct, SeedUser},
};
use cafego_storefront::models::SESSION_COOKIE_NAME;
use cafego_storefront::services::SessionStore;
use cafego_storefront::state::AppState;

/// A seeded storefront running in-process.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
    pub sessions: SessionStore,
}

/// Users and products every test starts with.
///
/// `alice`/`pw1` and `bob`/`pw2`; products 1 to 3.
#[must_use]
pub fn demo_seed() -> SeedData {
    let user = |username: &str, password: &str, display_name: &str| SeedUser {
        username: username.to_owned(),
        password: password.to_owned(),
        display_name: display_name.to_owned(),
    };
    let product = |id: i64, name: &str, cents: i64| SeedProduct {
        id: Some(ProductId::new(id)),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        description: format!("{name} from the test catalog."),
    };

    SeedData {
        users: vec![user("alice", "pw1", "Alice"), user("bob", "pw2", "Bob")],
        products: vec![
            product(1, "Espresso", 300),
            product(2, "Croissant", 275),
            product(3, "Flat White", 450),
        ],
    }
}

impl TestContext {
    /// Build a fresh, seeded storefront.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory database cannot be prepared.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("in-memory pool should open");
        db::run_migrations(&pool)
            .await
            .expect("migrations should apply");
        db::seed::apply(&pool, &demo_seed())
            .await
            .expect("demo data should seed");

        let sessions = SessionStore::new();
        let state =
            AppState::with_sessions(StorefrontConfig::default(), pool.clone(), sessions.clone());

        Self {
            app: cafego_storefront::app(state),
            pool,
            sessions,
        }
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router itself fails (it is infallible in practice).
    #[allow(clippy::expect_used)]
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET uri`, optionally with a session cookie value.
    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        self.send(build_request("GET", uri, session, None)).await
    }

    /// `POST uri` with a url-encoded form body.
    pub async fn post_form(&self, uri: &str, body: &str, session: Option<&str>) -> Response<Body> {
        self.send(build_request("POST", uri, session, Some(body)))
            .await
    }

    /// Log in and return the session cookie value.
    ///
    /// # Panics
    ///
    /// Panics if the login does not set a session cookie.
    #[allow(clippy::expect_used)]
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form(
                "/login/",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        session_cookie(&response).expect("login should set the session cookie")
    }

    /// Database ID of a seeded user.
    ///
    /// # Panics
    ///
    /// Panics if the user does not exist.
    #[allow(clippy::expect_used)]
    pub async fn user_id(&self, username: &str) -> UserId {
        UserRepository::new(&self.pool)
            .get_credentials(username)
            .await
            .expect("user lookup should succeed")
            .expect("user should be seeded")
            .0
            .id
    }
}

#[allow(clippy::expect_used)]
fn build_request(method: &str, uri: &str, session: Option<&str>, form: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = session {
        let cookie = Cookie::new(SESSION_COOKIE_NAME, token);
        builder = builder.header(header::COOKIE, cookie.encoded().to_string());
    }

    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_owned())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("request should build")
}

/// Decoded value of the `cafego_session` cookie set by a response, if any.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = set_cookie_header(response)?;
    let cookie = Cookie::parse_encoded(raw).ok()?;
    (cookie.name() == SESSION_COOKIE_NAME).then(|| cookie.value().to_owned())
}

/// Raw `Set-Cookie` header of a response, if any.
#[must_use]
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// `Location` header of a redirect response, if any.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Read a response body as UTF-8 text.
///
/// # Panics
///
/// Panics if the body cannot be read.
#[allow(clippy::expect_used)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8_lossy(&bytes).into_owned()
}
