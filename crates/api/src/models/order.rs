//! Cart and purchase domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use learning_center_core::{CourseId, CoursePrice, OrderId, UserId};

/// One line item in a user's open cart.
///
/// Items keep their add order; there is at most one per course (adding a
/// course already in the cart is a no-op).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub course_id: CourseId,
    pub course_name: String,
    /// Price as listed when the item was added; free courses carry none.
    pub price: Option<CoursePrice>,
    pub added_at: DateTime<Utc>,
}

/// A permanent purchase record created by one checkout.
///
/// Append-only after creation; there is no refund or cancellation
/// transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub username: String,
    /// Always `"completed"`.
    pub status: String,
    pub purchased_at: DateTime<Utc>,
    pub courses: Vec<PurchasedCourse>,
}

/// One course within a purchase record.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedCourse {
    pub course_id: CourseId,
    pub course_name: String,
    pub price: Option<CoursePrice>,
}

/// A purchased line item flattened across orders, annotated with its
/// purchase time. Listings are newest-order-first.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedItem {
    pub order_id: OrderId,
    pub course_id: CourseId,
    pub course_name: String,
    pub price: Option<CoursePrice>,
    pub purchased_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_serializes_camel_case() {
        let item = CartItem {
            course_id: CourseId::parse("rust-101").unwrap(),
            course_name: "Intro to Rust".to_owned(),
            price: Some(CoursePrice::new("$49.99")),
            added_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["courseId"], "rust-101");
        assert_eq!(json["courseName"], "Intro to Rust");
        assert_eq!(json["price"], "$49.99");
        assert!(json.get("addedAt").is_some());
    }
}
