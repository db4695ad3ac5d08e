//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`OptionalAuth`] and [`RequireAuth`] extractors.

pub mod auth;
pub mod request_id;

pub use auth::{OptionalAuth, RequireAuth, session_cookie};
pub use request_id::request_id_middleware;
