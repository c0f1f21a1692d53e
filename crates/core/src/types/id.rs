//! Newtype identifiers for type-safe entity references.
//!
//! Numeric IDs use the `define_id!` macro; the course identifier is a
//! validated repository name, since a course has no identity of its own
//! beyond the repository that backs it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use learning_center_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(OrderId);

/// Errors that can occur when parsing a [`CourseId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CourseIdError {
    /// The input string is empty.
    #[error("course id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("course id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9._-]`.
    #[error("course id contains invalid character '{0}'")]
    InvalidChar(char),
    /// The input starts with a dot.
    #[error("course id cannot start with a dot")]
    LeadingDot,
}

/// Identifier of a course.
///
/// A course is a 1:1 projection of a hosted repository, so its identifier is
/// the repository name. Validation mirrors what the hosting provider accepts
/// for repository names, which also keeps the value safe to splice into
/// request paths.
///
/// ## Constraints
///
/// - Length: 1-100 characters
/// - Characters: ASCII letters, digits, `.`, `_`, `-`
/// - Must not start with a dot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Maximum length of a course identifier (repository name limit).
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `CourseId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, starts with a dot,
    /// or contains a character outside `[A-Za-z0-9._-]`.
    pub fn parse(s: &str) -> Result<Self, CourseIdError> {
        if s.is_empty() {
            return Err(CourseIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(CourseIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.starts_with('.') {
            return Err(CourseIdError::LeadingDot);
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(CourseIdError::InvalidChar(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the course identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CourseId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CourseId {
    type Err = CourseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseId {
    type Error = CourseIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CourseId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CourseId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CourseId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(UserId::from(42), id);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn test_course_id_valid() {
        assert!(CourseId::parse("rust-for-beginners").is_ok());
        assert!(CourseId::parse("Intro_to_Go").is_ok());
        assert!(CourseId::parse("course.v2").is_ok());
        assert!(CourseId::parse("a").is_ok());
    }

    #[test]
    fn test_course_id_empty() {
        assert!(matches!(CourseId::parse(""), Err(CourseIdError::Empty)));
    }

    #[test]
    fn test_course_id_too_long() {
        let long = "a".repeat(101);
        assert!(matches!(
            CourseId::parse(&long),
            Err(CourseIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_course_id_leading_dot() {
        assert!(matches!(
            CourseId::parse(".hidden"),
            Err(CourseIdError::LeadingDot)
        ));
    }

    #[test]
    fn test_course_id_invalid_char() {
        assert!(matches!(
            CourseId::parse("path/traversal"),
            Err(CourseIdError::InvalidChar('/'))
        ));
        assert!(matches!(
            CourseId::parse("with space"),
            Err(CourseIdError::InvalidChar(' '))
        ));
    }

    #[test]
    fn test_course_id_serde_rejects_invalid() {
        let ok: Result<CourseId, _> = serde_json::from_str("\"rust-101\"");
        assert!(ok.is_ok());

        let bad: Result<CourseId, _> = serde_json::from_str("\"../etc\"");
        assert!(bad.is_err());
    }
}
