//! Authentication service.
//!
//! Provides username/password login backed by the in-memory session store.
//! Passwords are stored and compared as plain text.

mod error;

pub use error::AuthError;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::db::users::UserRepository;
use crate::models::{CurrentUser, SessionToken};
use crate::services::SessionStore;

/// Authentication service.
///
/// Checks credentials and issues session tokens.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: &'a SessionStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, sessions: &'a SessionStore) -> Self {
        Self {
            users: UserRepository::new(pool),
            sessions,
        }
    }

    /// Login with username and password.
    ///
    /// On success a fresh token is recorded in the session store and
    /// returned alongside the identity it resolves to. On failure the
    /// session store is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password does not match exactly.
    /// Returns `AuthError::Repository` if the lookup fails.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(SessionToken, CurrentUser), AuthError> {
        let Some((user, stored)) = self.users.get_credentials(username).await? else {
            warn!("Login attempt for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if stored.expose_secret() != password {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = SessionToken::generate();
        let current = CurrentUser::from(user);
        self.sessions.set(token.clone(), current.clone()).await;

        info!(user_id = %current.id, "User logged in");
        Ok((token, current))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_valid_login_issues_resolvable_token() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice", "pw1").await;
        let sessions = SessionStore::new();

        let (token, current) = AuthService::new(&pool, &sessions)
            .login("alice", "pw1")
            .await
            .unwrap();

        assert_eq!(current.id, alice.id);
        assert_eq!(sessions.get(Some(&token)).await, Some(current));
    }

    #[tokio::test]
    async fn test_wrong_password_creates_no_session() {
        let pool = test_support::pool().await;
        test_support::user(&pool, "alice", "pw1").await;
        let sessions = SessionStore::new();

        let err = AuthService::new(&pool, &sessions)
            .login("alice", "PW1")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let pool = test_support::pool().await;
        let sessions = SessionStore::new();

        let err = AuthService::new(&pool, &sessions)
            .login("mallory", "pw1")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_each_login_gets_its_own_token() {
        let pool = test_support::pool().await;
        test_support::user(&pool, "alice", "pw1").await;
        let sessions = SessionStore::new();
        let auth = AuthService::new(&pool, &sessions);

        let (first, _) = auth.login("alice", "pw1").await.unwrap();
        let (second, _) = auth.login("alice", "pw1").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(sessions.len().await, 2);
    }
}
