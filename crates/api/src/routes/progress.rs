//! Progress tracking route handlers.
//!
//! The completion percentage is computed against the course-wide leaf-file
//! count from a full (cached) tree walk, so it does not shrink as more of
//! the tree gets discovered. If the walk fails, the denominator degrades
//! to the completed count for that response.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use learning_center_core::{CourseId, UserId};

use crate::db::ProgressRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Mark-complete request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCompleteRequest {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub path: String,
}

/// Progress summary for one user and course.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed: Vec<String>,
    pub total: u64,
    pub percent: u32,
}

/// Mark one content path complete; responds with the updated summary.
///
/// Idempotent: completing an already-complete path changes nothing.
#[instrument(skip(state, user, form), fields(user_id = %form.user_id, course_id = %form.course_id))]
pub async fn mark_complete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<MarkCompleteRequest>,
) -> Result<Json<ProgressSummary>> {
    ensure_owner(&user, form.user_id)?;

    if form.path.is_empty() {
        return Err(AppError::BadRequest("path cannot be empty".to_owned()));
    }

    let completed = ProgressRepository::new(state.pool())
        .mark_complete(form.user_id, &form.course_id, &form.path)
        .await?;

    let summary = summarize(&state, &form.course_id, completed).await;
    Ok(Json(summary))
}

/// Progress summary for one user and course.
#[instrument(skip(state, user), fields(user_id = %user_id, course_id = %course_id))]
pub async fn get_progress(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((user_id, course_id)): Path<(UserId, CourseId)>,
) -> Result<Json<ProgressSummary>> {
    ensure_owner(&user, user_id)?;

    let completed = ProgressRepository::new(state.pool())
        .get_completed(user_id, &course_id)
        .await?;

    let summary = summarize(&state, &course_id, completed).await;
    Ok(Json(summary))
}

/// Build a summary against the course-wide leaf count.
async fn summarize(state: &AppState, course_id: &CourseId, completed: Vec<String>) -> ProgressSummary {
    let total = match state.github().count_leaf_files(course_id.as_str()).await {
        Ok(total) => total,
        Err(e) => {
            // Completion was already recorded; degrade the denominator
            // rather than failing the request
            warn!(course_id = %course_id, error = %e, "Tree walk failed; using completed count as total");
            completed.len() as u64
        }
    };

    let percent = percent_of(completed.len() as u64, total);

    ProgressSummary {
        completed,
        total,
        percent,
    }
}

/// Completion percentage, clamped to 100 (completed paths may reference
/// files that no longer exist in the tree).
fn percent_of(completed: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation)] // clamped to 100
    {
        (completed.saturating_mul(100) / total).min(100) as u32
    }
}

/// Progress belongs to exactly one user; the session user must be that user.
fn ensure_owner(current: &CurrentUser, user_id: UserId) -> Result<()> {
    if current.id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "cannot act on another user's progress".to_owned(),
        ))
    }
}
