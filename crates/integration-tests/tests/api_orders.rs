//! Integration tests for the cart/checkout lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p learning-center-api)
//!
//! Run with: cargo test -p learning-center-integration-tests -- --ignored

use learning_center_integration_tests::{api_base_url, session_client, signup_student};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Cart Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_starts_empty() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders/cart/{}", user["id"]))
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = resp.json().await.expect("Failed to parse cart");
    assert!(items.is_empty(), "a fresh user has an empty cart");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_to_cart_is_idempotent() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    let body = json!({
        "userId": user["id"],
        "username": user["username"],
        "courseId": "rust-101",
        "courseName": "Intro to Rust",
        "price": "$49.99",
    });

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/api/orders/add-to-cart"))
            .json(&body)
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let items: Vec<Value> = client
        .get(format!("{base_url}/api/orders/cart/{}", user["id"]))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(items.len(), 1, "duplicate adds collapse to one line item");
    assert_eq!(items[0]["courseId"], "rust-101");
    assert_eq!(items[0]["price"], "$49.99");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_remove_from_cart() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    let add = json!({
        "userId": user["id"],
        "username": user["username"],
        "courseId": "go-basics",
        "courseName": "Go Basics",
    });
    client
        .post(format!("{base_url}/api/orders/add-to-cart"))
        .json(&add)
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .delete(format!("{base_url}/api/orders/remove"))
        .json(&json!({"userId": user["id"], "courseId": "go-basics"}))
        .send()
        .await
        .expect("Failed to remove from cart");

    assert_eq!(resp.status(), StatusCode::OK);
    let remaining: Vec<Value> = resp.json().await.expect("Failed to parse response");
    assert!(
        remaining.iter().all(|i| i["courseId"] != "go-basics"),
        "removed course must not reappear"
    );

    // Removing again reports the missing item
    let resp = client
        .delete(format!("{base_url}/api/orders/remove"))
        .json(&json!({"userId": user["id"], "courseId": "go-basics"}))
        .send()
        .await
        .expect("Failed to issue remove");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Checkout Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_empty_cart_conflicts() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/orders/checkout"))
        .json(&json!({"userId": user["id"]}))
        .send()
        .await
        .expect("Failed to checkout");

    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let purchased: Vec<Value> = client
        .get(format!("{base_url}/api/orders/purchased/{}", user["id"]))
        .send()
        .await
        .expect("Failed to get purchases")
        .json()
        .await
        .expect("Failed to parse purchases");
    assert!(purchased.is_empty(), "empty-cart checkout mutates nothing");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_moves_cart_to_purchased() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    for (id, name, price) in [
        ("rust-101", "Intro to Rust", Some("$49.99")),
        ("git-basics", "Git Basics", None),
    ] {
        let mut body = json!({
            "userId": user["id"],
            "username": user["username"],
            "courseId": id,
            "courseName": name,
        });
        if let Some(price) = price {
            body["price"] = json!(price);
        }
        client
            .post(format!("{base_url}/api/orders/add-to-cart"))
            .json(&body)
            .send()
            .await
            .expect("Failed to add to cart");
    }

    let resp = client
        .post(format!("{base_url}/api/orders/checkout"))
        .json(&json!({"userId": user["id"]}))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["status"], "completed");
    assert_eq!(order["courses"].as_array().map(Vec::len), Some(2));

    // Cart is now empty
    let items: Vec<Value> = client
        .get(format!("{base_url}/api/orders/cart/{}", user["id"]))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert!(items.is_empty(), "checkout empties the cart");

    // Purchases contain exactly the former cart items, annotated with a
    // purchase timestamp
    let purchased: Vec<Value> = client
        .get(format!("{base_url}/api/orders/purchased/{}", user["id"]))
        .send()
        .await
        .expect("Failed to get purchases")
        .json()
        .await
        .expect("Failed to parse purchases");
    assert_eq!(purchased.len(), 2);
    assert!(purchased.iter().all(|p| p.get("purchasedAt").is_some()));
    assert!(purchased.iter().any(|p| p["courseId"] == "rust-101"));
    assert!(purchased.iter().any(|p| p["courseId"] == "git-basics"));
}

// ============================================================================
// Ownership Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cannot_touch_another_users_cart() {
    let client = session_client();
    let user = signup_student(&client).await;
    let base_url = api_base_url();

    let other_id = user["id"].as_i64().expect("numeric user id") + 1;

    let resp = client
        .get(format!("{base_url}/api/orders/cart/{other_id}"))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .post(format!("{base_url}/api/orders/add-to-cart"))
        .json(&json!({
            "userId": other_id,
            "username": "someone-else",
            "courseId": "rust-101",
            "courseName": "Intro to Rust",
        }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_orders_require_a_session() {
    let client = session_client(); // never signed in
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders/cart/1"))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
