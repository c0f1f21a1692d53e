//! Session-related types.
//!
//! The session is the server-side source of truth for who is signed in;
//! anything a client caches is just that - a cache, invalidated at logout.

use serde::{Deserialize, Serialize};

use learning_center_core::{UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name (denormalized into cart rows on add).
    pub username: String,
    /// Student or teacher.
    pub role: UserRole,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
