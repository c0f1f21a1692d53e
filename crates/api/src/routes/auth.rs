//! Identity route handlers.
//!
//! Sign-up and sign-in establish a server-side session; the session is the
//! source of truth for the signed-in user and is rotated on every
//! authentication to prevent fixation.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use learning_center_core::UserRole;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Sign-up request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Sign-in request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account and sign it in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(
            &form.username,
            &form.email,
            &form.password,
            form.role,
            form.profile_image.as_deref(),
        )
        .await?;

    let current = establish_session(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(current)))
}

/// Sign in with email and password.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn signin(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SigninRequest>,
) -> Result<Json<CurrentUser>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&form.email, &form.password).await?;

    let current = establish_session(&session, &user).await?;

    Ok(Json(current))
}

/// Sign out: drop the session identity.
#[instrument(skip(session))]
pub async fn signout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Profile-edit request body.
///
/// Role is deliberately absent: it is fixed at sign-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// The signed-in user's full profile.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    Ok(Json(user))
}

/// Edit the signed-in user's profile (display name, avatar).
#[instrument(skip(state, current, form), fields(user_id = %current.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Json(form): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("username cannot be empty".to_owned()));
    }

    let user = UserRepository::new(state.pool())
        .update_profile(current.id, username, form.profile_image.as_deref())
        .await?;

    // Keep the session's denormalized copy in step with the edit
    let refreshed = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    set_current_user(&session, &refreshed)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;

    Ok(Json(user))
}

/// Rotate the session id and store the user's identity in it.
async fn establish_session(session: &Session, user: &User) -> Result<CurrentUser> {
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    };

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to rotate session: {e}")))?;
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;

    Ok(current)
}
