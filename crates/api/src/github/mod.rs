//! GitHub gateway: the remote repository provider behind the catalog.
//!
//! # Architecture
//!
//! - GitHub is the source of truth - NO local sync, direct REST calls
//! - Read responses cached in-memory via `moka` (configurable TTL,
//!   keyed by repository and path)
//! - Raw file content (READMEs, course files) is read from the raw host
//!   on the configured branch
//!
//! # Example
//!
//! ```rust,ignore
//! use learning_center_api::github::GithubClient;
//!
//! let client = GithubClient::new(&config.github);
//!
//! // List repositories (one repository = one course)
//! let repos = client.list_repositories().await?;
//!
//! // Browse a course's content tree lazily
//! let root = client.list_contents("rust-101", "").await?;
//! let lectures = client.list_contents("rust-101", "lectures").await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::GithubClient;
pub use types::{ContentEntry, EntryType, RepoSummary};

use thiserror::Error;

/// Errors that can occur when talking to GitHub.
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub returned a non-success status.
    #[error("GitHub returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Repository or path does not exist upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by GitHub.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GithubError {
    /// Whether this error means the resource is permanently absent, as
    /// opposed to the provider being unreachable or failing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_error_display() {
        let err = GithubError::NotFound("rust-101/README.md".to_string());
        assert_eq!(err.to_string(), "Not found: rust-101/README.md");

        let err = GithubError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub returned 500: boom");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = GithubError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_is_not_found() {
        assert!(GithubError::NotFound("x".to_string()).is_not_found());
        assert!(
            !GithubError::Status {
                status: 502,
                body: String::new()
            }
            .is_not_found()
        );
    }
}
