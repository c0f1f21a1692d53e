//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use learning_center_core::{Email, UserId, UserRole};

/// A marketplace user.
///
/// Role is fixed at sign-up; there is no mutation path for it anywhere.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// User's email address.
    pub email: Email,
    /// Student or teacher.
    pub role: UserRole,
    /// Avatar URL or data URI, if set.
    pub profile_image: Option<String>,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
    /// When the profile was last edited.
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub profile_image: Option<&'a str>,
}
