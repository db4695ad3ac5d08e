//! In-memory session store.
//!
//! Maps an opaque [`SessionToken`] to the [`CurrentUser`] it was issued for.
//! Sessions live as long as the process: there is no expiry, rotation or
//! revocation, and a restart logs everybody out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{CurrentUser, SessionToken};

/// Shared token to identity map.
///
/// Cloning is cheap; all clones see the same sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionToken, CurrentUser>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user` under `token`, replacing any previous identity.
    pub async fn set(&self, token: SessionToken, user: CurrentUser) {
        self.inner.write().await.insert(token, user);
    }

    /// Look up the identity for `token`.
    ///
    /// A missing token and an unknown token both yield `None`.
    pub async fn get(&self, token: Option<&SessionToken>) -> Option<CurrentUser> {
        let token = token?;
        self.inner.read().await.get(token).cloned()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no session has been issued yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use cafego_core::UserId;

    use super::*;

    fn alice() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            username: "alice".to_owned(),
            display_name: "Alice".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = SessionStore::new();
        let token = SessionToken::generate();

        store.set(token.clone(), alice()).await;

        assert_eq!(store.get(Some(&token)).await, Some(alice()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_missing_tokens() {
        let store = SessionStore::new();
        store.set(SessionToken::generate(), alice()).await;

        let stranger = SessionToken::from_cookie_value("bm90LWEtcmVhbC10b2tlbg==");
        assert_eq!(store.get(Some(&stranger)).await, None);
        assert_eq!(store.get(None).await, None);
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let store = SessionStore::new();
        let handle = store.clone();
        let token = SessionToken::generate();

        handle.set(token.clone(), alice()).await;

        assert!(!store.is_empty().await);
        assert!(store.get(Some(&token)).await.is_some());
    }
}
