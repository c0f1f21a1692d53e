//! Database operations for the marketplace `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - Marketplace accounts (students and teachers)
//! - `cart_items` - One open cart per user, one row per course
//! - `purchased_orders` / `purchased_items` - Permanent purchase records
//! - `user_progress` - Completed content paths per user and course
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! All queries are runtime-checked (`sqlx::query` / `query_as`), so the
//! workspace builds without a live database. Cart mutations are single
//! atomic statements and checkout is one transaction; there is no
//! read-modify-write anywhere in this module.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p learning-center-cli -- migrate
//! ```

pub mod orders;
pub mod progress;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use progress::ProgressRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
