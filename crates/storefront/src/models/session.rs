//! Session-related types.
//!
//! Types stored in the session store for authentication state.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

use cafego_core::UserId;

use super::User;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cafego_session";

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 16;

/// Opaque identifier linking a cookie to a server-held user identity.
///
/// Generated from 16 bytes of OS-seeded CSPRNG output, standard base64
/// encoded (24 characters).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Wrap a token value read back from a cookie.
    #[must_use]
    pub fn from_cookie_value(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// The token as it is written into the cookie.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Session-stored user identity.
///
/// Minimal data kept in the session store to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Name shown in page headers.
    pub display_name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = SessionToken::generate();
        // 16 bytes -> 24 base64 characters including padding
        assert_eq!(token.as_str().len(), 24);
        assert!(token.as_str().ends_with("=="));
        assert!(STANDARD.decode(token.as_str()).is_ok_and(|b| b.len() == TOKEN_BYTES));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = SessionToken::from_cookie_value("c2VjcmV0LXRva2VuLXZhbHVl");
        let debug_output = format!("{token:?}");
        assert!(!debug_output.contains("c2VjcmV0"));
        assert!(debug_output.contains("REDACTED"));
    }
}
