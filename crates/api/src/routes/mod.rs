//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB)
//!
//! # Catalog (public)
//! GET  /api/repos                       - Course catalog
//! GET  /api/readme/{repo}               - Parsed course metadata
//! GET  /api/repos/{repo}/contents/image - Thumbnail URL (never errors)
//!
//! # Content browsing (signed-in; teacher or purchased)
//! GET  /api/repos/{repo}/contents         - Root directory listing
//! GET  /api/repos/{repo}/contents/{*path} - Subdirectory listing (lazy)
//! GET  /api/repos/{repo}/file/{*path}     - Renderable file descriptor
//!
//! # Orders (signed-in, own userId only)
//! POST   /api/orders/add-to-cart        - body {userId, username, courseId, courseName, price?}
//! DELETE /api/orders/remove             - body {userId, courseId}
//! GET    /api/orders/cart/{userId}      - Cart line items
//! POST   /api/orders/checkout           - body {userId}
//! GET    /api/orders/purchased/{userId} - Purchased items, newest first
//!
//! # Progress (signed-in, own userId only)
//! POST /api/progress                    - body {userId, courseId, path}
//! GET  /api/progress/{userId}/{courseId}
//!
//! # Identity
//! POST /api/signup  /api/signin  /api/signout
//! GET  /api/me                          - Full profile of the session user
//! PUT  /api/me                          - Edit profile (username, avatar)
//! ```

pub mod auth;
pub mod catalog;
pub mod contents;
pub mod orders;
pub mod progress;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the catalog routes (public).
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/repos", get(catalog::index))
        .route("/readme/{repo}", get(catalog::readme))
        .route("/repos/{repo}/contents/image", get(catalog::thumbnail))
}

/// Create the content browsing routes (require purchase or teacher role).
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/repos/{repo}/contents", get(contents::list_root))
        .route("/repos/{repo}/contents/{*path}", get(contents::list_path))
        .route("/repos/{repo}/file/{*path}", get(contents::file))
}

/// Create the order routes.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/add-to-cart", post(orders::add_to_cart))
        .route("/remove", delete(orders::remove))
        .route("/cart/{user_id}", get(orders::cart))
        .route("/checkout", post(orders::checkout))
        .route("/purchased/{user_id}", get(orders::purchased))
}

/// Create the progress routes.
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/progress", post(progress::mark_complete))
        .route("/progress/{user_id}/{course_id}", get(progress::get_progress))
}

/// Create the identity routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/signout", post(auth::signout))
        .route("/me", get(auth::me).put(auth::update_me))
}

/// Create all routes for the API, mounted under `/api`.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .merge(content_routes())
        .nest("/orders", order_routes())
        .merge(progress_routes())
        .merge(auth_routes());

    Router::new().nest("/api", api)
}
