//! CLI command implementations.

pub mod migrate;
pub mod user;

use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("auth error: {0}")]
    Auth(#[from] learning_center_api::services::auth::AuthError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Database URL from the environment, with the same fallback the API uses.
pub(crate) fn database_url() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("LEARNING_CENTER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("LEARNING_CENTER_DATABASE_URL"))
}
