//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use learning_center_core::CourseId;

use crate::catalog::Course;
use crate::error::{AppError, Result};
use crate::readme::CourseMetadata;
use crate::state::AppState;

/// Thumbnail response; `image` is empty when none could be resolved.
#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub image: String,
}

/// List the course catalog.
///
/// One course per repository; metadata failures degrade individual
/// courses to defaults rather than failing the listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Course>>> {
    let courses = state.catalog().list_courses().await?;
    Ok(Json(courses))
}

/// Parsed course metadata from a repository's README.
#[instrument(skip(state), fields(repo = %repo))]
pub async fn readme(
    State(state): State<AppState>,
    Path(repo): Path<String>,
) -> Result<Json<CourseMetadata>> {
    let course_id = CourseId::parse(&repo)
        .map_err(|e| AppError::BadRequest(format!("invalid course id: {e}")))?;

    let metadata = state.catalog().get_metadata(course_id.as_str()).await?;
    Ok(Json(metadata))
}

/// Resolve a course's thumbnail URL.
///
/// Best-effort by contract: always responds 200, with an empty string when
/// nothing could be resolved.
#[instrument(skip(state), fields(repo = %repo))]
pub async fn thumbnail(
    State(state): State<AppState>,
    Path(repo): Path<String>,
) -> Json<ThumbnailResponse> {
    // Never errors: a malformed id just resolves to no thumbnail
    let image = match CourseId::parse(&repo) {
        Ok(course_id) => state
            .github()
            .resolve_thumbnail(course_id.as_str())
            .await
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    Json(ThumbnailResponse { image })
}
