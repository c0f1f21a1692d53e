//! Cart and purchase repository.
//!
//! The cart is keyed by `(user_id, course_id)`, so adds are idempotent at
//! the storage layer and two concurrent mutations for the same user cannot
//! lose writes. Checkout runs as one transaction: the purchase record and
//! the cart deletion either both happen or neither does.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use learning_center_core::{CourseId, CoursePrice, OrderId, UserId};

use super::RepositoryError;
use crate::models::order::{CartItem, PurchasedCourse, PurchasedItem, PurchasedOrder};

/// Cart row including the denormalized username (needed at checkout).
#[derive(Debug, FromRow)]
struct CartRow {
    username: String,
    course_id: CourseId,
    course_name: String,
    price: Option<CoursePrice>,
}

/// Purchase order header row.
#[derive(Debug, FromRow)]
struct OrderHeaderRow {
    id: i32,
    status: String,
    purchased_at: DateTime<Utc>,
}

/// Repository for cart and purchase operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a course to the user's cart.
    ///
    /// Idempotent: adding a course already in the cart changes nothing.
    /// Returns `true` if a new line item was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self), fields(user_id = %user_id, course_id = %course_id))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        username: &str,
        course_id: &CourseId,
        course_name: &str,
        price: Option<&CoursePrice>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO cart_items (user_id, username, course_id, course_name, price) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(user_id.as_i32())
        .bind(username)
        .bind(course_id.as_str())
        .bind(course_name)
        .bind(price.map(CoursePrice::as_str))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a course from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart has no such item.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self), fields(user_id = %user_id, course_id = %course_id))]
    pub async fn remove_from_cart(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND course_id = $2")
            .bind(user_id.as_i32())
            .bind(course_id.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List the user's cart in add order.
    ///
    /// A user with no cart gets an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT course_id, course_name, price, added_at \
             FROM cart_items \
             WHERE user_id = $1 \
             ORDER BY added_at, course_id",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Convert the user's cart into a purchase record.
    ///
    /// Runs as a single transaction: cart rows are locked, a purchase
    /// record with all line items is created, and the cart is emptied.
    /// Returns `None` (and mutates nothing) when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn checkout(
        &self,
        user_id: UserId,
    ) -> Result<Option<PurchasedOrder>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart = sqlx::query_as::<_, CartRow>(
            "SELECT username, course_id, course_name, price \
             FROM cart_items \
             WHERE user_id = $1 \
             ORDER BY added_at, course_id \
             FOR UPDATE",
        )
        .bind(user_id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        let Some(first) = cart.first() else {
            // Empty cart: nothing to purchase, nothing mutated
            return Ok(None);
        };
        let username = first.username.clone();

        let header = sqlx::query_as::<_, OrderHeaderRow>(
            "INSERT INTO purchased_orders (user_id, username) \
             VALUES ($1, $2) \
             RETURNING id, status, purchased_at",
        )
        .bind(user_id.as_i32())
        .bind(&username)
        .fetch_one(&mut *tx)
        .await?;

        for item in &cart {
            sqlx::query(
                "INSERT INTO purchased_items (order_id, course_id, course_name, price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(header.id)
            .bind(item.course_id.as_str())
            .bind(&item.course_name)
            .bind(item.price.as_ref().map(CoursePrice::as_str))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(PurchasedOrder {
            id: OrderId::new(header.id),
            user_id,
            username,
            status: header.status,
            purchased_at: header.purchased_at,
            courses: cart
                .into_iter()
                .map(|item| PurchasedCourse {
                    course_id: item.course_id,
                    course_name: item.course_name,
                    price: item.price,
                })
                .collect(),
        }))
    }

    /// All of the user's purchased line items, newest order first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_purchased(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PurchasedItem>, RepositoryError> {
        let items = sqlx::query_as::<_, PurchasedItem>(
            "SELECT o.id AS order_id, i.course_id, i.course_name, i.price, o.purchased_at \
             FROM purchased_items i \
             JOIN purchased_orders o ON o.id = i.order_id \
             WHERE o.user_id = $1 \
             ORDER BY o.purchased_at DESC, o.id DESC, i.course_id",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Whether the user has purchased a given course.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_purchased(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 \
                 FROM purchased_items i \
                 JOIN purchased_orders o ON o.id = i.order_id \
                 WHERE o.user_id = $1 AND i.course_id = $2 \
             )",
        )
        .bind(user_id.as_i32())
        .bind(course_id.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
