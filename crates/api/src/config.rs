//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LEARNING_CENTER_DATABASE_URL` - `PostgreSQL` connection string
//! - `LEARNING_CENTER_BASE_URL` - Public URL for the API
//! - `LEARNING_CENTER_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `GITHUB_OWNER` - GitHub account whose repositories are the course catalog
//!
//! ## Optional
//! - `LEARNING_CENTER_HOST` - Bind address (default: 127.0.0.1)
//! - `LEARNING_CENTER_PORT` - Listen port (default: 4000)
//! - `GITHUB_API_BASE` - REST API base (default: <https://api.github.com>)
//! - `GITHUB_RAW_BASE` - Raw content base (default: <https://raw.githubusercontent.com>)
//! - `GITHUB_DEFAULT_BRANCH` - Branch raw files are read from (default: main)
//! - `GITHUB_TOKEN` - Bearer token for authenticated API calls (higher rate limits)
//! - `GITHUB_CACHE_TTL_SECS` - Gateway cache TTL (default: 300)
//! - `GITHUB_TIMEOUT_SECS` - Per-request timeout on gateway calls (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the API
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// GitHub gateway configuration
    pub github: GithubConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// GitHub gateway configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct GithubConfig {
    /// Account whose repositories form the course catalog
    pub owner: String,
    /// REST API base URL (e.g., <https://api.github.com>)
    pub api_base: String,
    /// Raw content base URL (e.g., <https://raw.githubusercontent.com>)
    pub raw_base: String,
    /// Branch raw files (READMEs, course files) are read from
    pub default_branch: String,
    /// Optional bearer token for authenticated calls
    pub token: Option<SecretString>,
    /// TTL for cached gateway responses
    pub cache_ttl: Duration,
    /// Per-request timeout on outbound calls
    pub request_timeout: Duration,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("owner", &self.owner)
            .field("api_base", &self.api_base)
            .field("raw_base", &self.raw_base)
            .field("default_branch", &self.default_branch)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("LEARNING_CENTER_DATABASE_URL")?;
        let host = get_env_or_default("LEARNING_CENTER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LEARNING_CENTER_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("LEARNING_CENTER_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LEARNING_CENTER_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("LEARNING_CENTER_BASE_URL")?;
        let session_secret = get_validated_secret("LEARNING_CENTER_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "LEARNING_CENTER_SESSION_SECRET")?;

        let github = GithubConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            github,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GithubConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let cache_ttl = get_env_or_default("GITHUB_CACHE_TTL_SECS", "300")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GITHUB_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;
        let request_timeout = get_env_or_default("GITHUB_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GITHUB_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            owner: get_required_env("GITHUB_OWNER")?,
            api_base: get_env_or_default("GITHUB_API_BASE", "https://api.github.com"),
            raw_base: get_env_or_default("GITHUB_RAW_BASE", "https://raw.githubusercontent.com"),
            default_branch: get_env_or_default("GITHUB_DEFAULT_BRANCH", "main"),
            token: get_optional_env("GITHUB_TOKEN").map(SecretString::from),
            cache_ttl: Duration::from_secs(cache_ttl),
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-session-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4000,
            base_url: "http://localhost:4000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            github: GithubConfig {
                owner: "LearningCenter-web".to_string(),
                api_base: "https://api.github.com".to_string(),
                raw_base: "https://raw.githubusercontent.com".to_string(),
                default_branch: "main".to_string(),
                token: None,
                cache_ttl: Duration::from_secs(300),
                request_timeout: Duration::from_secs(10),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_github_config_debug_redacts_token() {
        let config = GithubConfig {
            owner: "LearningCenter-web".to_string(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            default_branch: "main".to_string(),
            token: Some(SecretString::from("ghp_super_secret_token")),
            cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("LearningCenter-web"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ghp_super_secret_token"));
    }
}
