//! Cart and purchase route handlers.
//!
//! Request bodies carry `userId` for wire compatibility with the browser
//! client, but every operation is guarded: the id must match the session
//! user, so nobody mutates or reads another user's orders.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use learning_center_core::{CourseId, CoursePrice, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::models::order::{CartItem, PurchasedItem, PurchasedOrder};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub username: String,
    pub course_id: CourseId,
    pub course_name: String,
    #[serde(default)]
    pub price: Option<CoursePrice>,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: UserId,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Add a course to the cart.
///
/// Idempotent: adding a course already in the cart is a no-op and responds
/// identically.
#[instrument(skip(state, user, form), fields(user_id = %form.user_id, course_id = %form.course_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<MessageResponse>> {
    ensure_owner(&user, form.user_id)?;

    OrderRepository::new(state.pool())
        .add_to_cart(
            form.user_id,
            &form.username,
            &form.course_id,
            &form.course_name,
            form.price.as_ref(),
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Course added to cart successfully".to_owned(),
    }))
}

/// Remove a course from the cart; responds with the remaining items.
#[instrument(skip(state, user, form), fields(user_id = %form.user_id, course_id = %form.course_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<RemoveFromCartRequest>,
) -> Result<Json<Vec<CartItem>>> {
    ensure_owner(&user, form.user_id)?;

    let repo = OrderRepository::new(state.pool());
    repo.remove_from_cart(form.user_id, &form.course_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("{} is not in the cart", form.course_id))
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(repo.get_cart(form.user_id).await?))
}

/// List the user's cart.
///
/// A user who never added anything gets an empty list.
#[instrument(skip(state, user), fields(user_id = %user_id))]
pub async fn cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<CartItem>>> {
    ensure_owner(&user, user_id)?;

    let items = OrderRepository::new(state.pool()).get_cart(user_id).await?;
    Ok(Json(items))
}

/// Convert the cart into a purchase record.
///
/// Fails with 409 on an empty cart; otherwise responds with the created
/// order.
#[instrument(skip(state, user, form), fields(user_id = %form.user_id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<CheckoutRequest>,
) -> Result<Json<PurchasedOrder>> {
    ensure_owner(&user, form.user_id)?;

    let order = OrderRepository::new(state.pool())
        .checkout(form.user_id)
        .await?
        .ok_or(AppError::EmptyCart)?;

    Ok(Json(order))
}

/// List the user's purchased items, newest order first.
#[instrument(skip(state, user), fields(user_id = %user_id))]
pub async fn purchased(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<PurchasedItem>>> {
    ensure_owner(&user, user_id)?;

    let items = OrderRepository::new(state.pool())
        .get_purchased(user_id)
        .await?;
    Ok(Json(items))
}

/// Orders belong to exactly one user; the session user must be that user.
fn ensure_owner(current: &CurrentUser, user_id: UserId) -> Result<()> {
    if current.id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "cannot act on another user's orders".to_owned(),
        ))
    }
}
