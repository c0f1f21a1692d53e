//! User management commands.
//!
//! Creates marketplace accounts through the same `AuthService` the API
//! uses, so password hashing and validation rules stay in one place.

use secrecy::SecretString;

use learning_center_api::db;
use learning_center_api::services::auth::AuthService;
use learning_center_core::UserRole;

use super::{CommandError, database_url};

/// Create a user with the given role.
///
/// # Errors
///
/// Returns an error if the role or password is invalid, the email is taken,
/// or the database is unreachable.
pub async fn create(
    username: &str,
    email: &str,
    role: &str,
    password: Option<&str>,
) -> Result<(), CommandError> {
    let role: UserRole = role
        .parse()
        .map_err(|e: String| CommandError::InvalidInput(e))?;

    let password = match password {
        Some(p) => p.to_owned(),
        None => prompt_password()?,
    };

    let database_url = SecretString::from(database_url()?);
    let pool = db::create_pool(&database_url).await?;

    let auth = AuthService::new(&pool);
    let user = auth
        .register(username, email, &password, role, None)
        .await?;

    tracing::info!(id = %user.id, role = %user.role, "Created user {}", user.username);
    Ok(())
}

/// Read a password from stdin (no TTY echo handling; intended for
/// provisioning scripts).
fn prompt_password() -> Result<String, CommandError> {
    use std::io::BufRead;

    tracing::info!("Enter password:");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CommandError::InvalidInput(format!("failed to read password: {e}")))?;

    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(CommandError::InvalidInput("password cannot be empty".into()));
    }
    Ok(password)
}
