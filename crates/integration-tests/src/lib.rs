//! Integration tests for Learning Center.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p learning-center-cli -- migrate
//!
//! # Start the API
//! cargo run -p learning-center-api
//!
//! # Run integration tests
//! cargo test -p learning-center-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api_orders` - Cart/checkout lifecycle against a running server
//! - `api_catalog` - Catalog, content browsing and progress
//!
//! Catalog and content tests additionally need the configured
//! `GITHUB_OWNER` account to be reachable, so they exercise the real
//! gateway path end to end.

use reqwest::Client;
use serde_json::Value;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Create an HTTP client with a cookie store, so the session established
/// by sign-up/sign-in sticks for subsequent requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign up a fresh student account and return its session identity.
///
/// Uses a random email so runs don't collide.
///
/// # Panics
///
/// Panics if the request fails or the response is not a created user.
pub async fn signup_student(client: &Client) -> Value {
    signup(client, "student").await
}

/// Sign up a fresh teacher account and return its session identity.
///
/// # Panics
///
/// Panics if the request fails or the response is not a created user.
pub async fn signup_teacher(client: &Client) -> Value {
    signup(client, "teacher").await
}

async fn signup(client: &Client, role: &str) -> Value {
    let base_url = api_base_url();
    let email = format!("{role}-{}@example.com", uuid::Uuid::new_v4());

    let resp = client
        .post(format!("{base_url}/api/signup"))
        .json(&serde_json::json!({
            "username": format!("test-{role}"),
            "email": email,
            "password": "integration-test-pw",
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(resp.status(), 201, "signup should create the account");
    resp.json().await.expect("Failed to parse signup response")
}
