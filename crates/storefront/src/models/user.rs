//! User domain types.

use cafego_core::UserId;

/// A shop user (domain type).
///
/// Users are created by seeding and are immutable while the server runs.
/// The password is deliberately not part of this type; it is only read by
/// [`UserRepository::get_credentials`](crate::db::users::UserRepository::get_credentials).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Name shown in page headers.
    pub display_name: String,
}
