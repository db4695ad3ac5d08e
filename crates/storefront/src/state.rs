//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::StorefrontConfig;
use crate::services::SessionStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the database pool, the session store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: SqlitePool,
    sessions: SessionStore,
}

impl AppState {
    /// Create a new application state with an empty session store.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: SqlitePool) -> Self {
        Self::with_sessions(config, pool, SessionStore::new())
    }

    /// Create a new application state around an existing session store.
    #[must_use]
    pub fn with_sessions(config: StorefrontConfig, pool: SqlitePool, sessions: SessionStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
