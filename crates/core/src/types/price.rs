//! Free-text course prices.
//!
//! Course prices come from README files written by teachers, so the value is
//! whatever was published: `"Free"`, `"20"`, `"$49.99"`, or anything else.
//! The type preserves the raw text and offers a best-effort numeric view;
//! callers must tolerate non-numeric values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of a course as published in its README.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoursePrice(String);

impl CoursePrice {
    /// The default price used when a README publishes none.
    pub const FREE: &'static str = "Free";

    /// Wrap a raw price string, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.len() == raw.len() {
            Self(raw)
        } else {
            Self(trimmed.to_owned())
        }
    }

    /// The raw price text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the course costs nothing: an empty value, the word "free"
    /// (any casing), or a numeric value equal to zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        if self.0.is_empty() || self.0.eq_ignore_ascii_case("free") {
            return true;
        }
        self.amount() == Some(Decimal::ZERO)
    }

    /// Best-effort numeric amount: strips one leading currency symbol and
    /// parses the rest as a decimal. `None` for non-numeric text.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        let s = self
            .0
            .trim()
            .trim_start_matches(['$', '€', '£'])
            .trim();
        s.parse::<Decimal>().ok()
    }
}

impl Default for CoursePrice {
    fn default() -> Self {
        Self(Self::FREE.to_owned())
    }
}

impl std::fmt::Display for CoursePrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoursePrice {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CoursePrice {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CoursePrice {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CoursePrice {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CoursePrice {
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
    fn test_free_variants() {
        assert!(CoursePrice::new("Free").is_free());
        assert!(CoursePrice::new("FREE").is_free());
        assert!(CoursePrice::new("").is_free());
        assert!(CoursePrice::new("0").is_free());
        assert!(CoursePrice::new("$0.00").is_free());
        assert!(!CoursePrice::new("49.99").is_free());
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(
            CoursePrice::new("$49.99").amount(),
            Some(Decimal::new(4999, 2))
        );
        assert_eq!(CoursePrice::new("20").amount(), Some(Decimal::new(20, 0)));
        assert_eq!(CoursePrice::new("Free").amount(), None);
        assert_eq!(CoursePrice::new("contact us").amount(), None);
    }

    #[test]
    fn test_default_is_free() {
        let price = CoursePrice::default();
        assert_eq!(price.as_str(), "Free");
        assert!(price.is_free());
    }

    #[test]
    fn test_raw_text_preserved() {
        let price = CoursePrice::new("  $49.99 ");
        assert_eq!(price.as_str(), "$49.99");
        assert_eq!(price.to_string(), "$49.99");
    }
}
