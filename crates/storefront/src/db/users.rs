//! User repository for database operations.
//!
//! Users are created by seeding; the web server only reads them.

use secrecy::SecretString;
use sqlx::SqlitePool;

use cafego_core::UserId;

use super::{RepositoryError, map_unique_violation};
use crate::models::User;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    display_name: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            display_name: r.display_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    username: String,
    display_name: String,
    password: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user and their stored password by username.
    ///
    /// Returns `None` if no user has that username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, SecretString)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, display_name, password
            FROM cgo_user
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            let user = User {
                id: r.id,
                username: r.username,
                display_name: r.display_name,
            };
            (user, SecretString::from(r.password))
        }))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO cgo_user (username, password, display_name)
            VALUES (?, ?, ?)
            RETURNING id, username, display_name
            ",
        )
        .bind(username)
        .bind(password)
        .bind(display_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        Ok(User::from(row))
    }
}
