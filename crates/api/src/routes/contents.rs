//! Content browsing route handlers.
//!
//! Listings are lazy: each directory level is fetched only when requested
//! (the gateway caches per `(repo, path)`). Opening a file returns a
//! renderable descriptor; markdown bodies are fetched and rendered, other
//! kinds carry their download URL.
//!
//! All routes require a signed-in user who is a teacher or has purchased
//! the course.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use learning_center_core::CourseId;

use crate::content::{self, FileDescriptor, RenderKind};
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::github::ContentEntry;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// List a course's root directory.
#[instrument(skip(state, user), fields(repo = %repo, user_id = %user.id))]
pub async fn list_root(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(repo): Path<String>,
) -> Result<Json<Vec<ContentEntry>>> {
    let course_id = parse_course_id(&repo)?;
    ensure_course_access(&state, &user, &course_id).await?;

    let entries = state.github().list_contents(course_id.as_str(), "").await?;
    Ok(Json(entries))
}

/// List one subdirectory of a course's content tree.
#[instrument(skip(state, user), fields(repo = %repo, path = %path, user_id = %user.id))]
pub async fn list_path(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((repo, path)): Path<(String, String)>,
) -> Result<Json<Vec<ContentEntry>>> {
    let course_id = parse_course_id(&repo)?;
    ensure_course_access(&state, &user, &course_id).await?;

    let entries = state
        .github()
        .list_contents(course_id.as_str(), &path)
        .await?;
    Ok(Json(entries))
}

/// Open one content file as a renderable descriptor.
#[instrument(skip(state, user), fields(repo = %repo, path = %path, user_id = %user.id))]
pub async fn file(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((repo, path)): Path<(String, String)>,
) -> Result<Json<FileDescriptor>> {
    let course_id = parse_course_id(&repo)?;
    ensure_course_access(&state, &user, &course_id).await?;

    let name = path.rsplit('/').next().unwrap_or(&path).to_owned();
    let kind = content::classify(&name);
    let download_url = state.github().raw_url(course_id.as_str(), &path);

    // Markdown is the one kind rendered server-side; everything else is
    // presented straight from its download URL
    let (text, html) = if kind == RenderKind::Markdown {
        let text = state
            .github()
            .get_raw_text(course_id.as_str(), &path)
            .await?;
        let html = content::render_markdown(&text);
        (Some(text), Some(html))
    } else {
        (None, None)
    };

    Ok(Json(FileDescriptor {
        name,
        path,
        kind,
        download_url,
        text,
        html,
    }))
}

/// Parse a path segment as a course identifier.
fn parse_course_id(repo: &str) -> Result<CourseId> {
    CourseId::parse(repo).map_err(|e| AppError::BadRequest(format!("invalid course id: {e}")))
}

/// Teachers browse any course; students only what they have purchased.
async fn ensure_course_access(
    state: &AppState,
    user: &CurrentUser,
    course_id: &CourseId,
) -> Result<()> {
    if user.role.is_teacher() {
        return Ok(());
    }

    let purchased = OrderRepository::new(state.pool())
        .has_purchased(user.id, course_id)
        .await?;

    if purchased {
        Ok(())
    } else {
        Err(AppError::Forbidden("course not purchased".to_owned()))
    }
}
