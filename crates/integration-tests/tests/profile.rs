//! Integration tests for identity resolution and profile sync.
//!
//! Requires a `PostgreSQL` database in `TEST_DATABASE_URL`.
//! Run with: cargo test -p emporium-integration-tests -- --ignored

use emporium_integration_tests::TestContext;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_me_before_sync_is_not_found() {
    let ctx = TestContext::new().await;
    let token = TestContext::token("test|never-synced", "ghost@example.com");

    let (status, body) = ctx.send(Method::GET, "/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Customer profile for user ID test|never-synced not found."
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_resync_updates_same_profile() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;

    let (status, again) = ctx
        .send(
            Method::POST,
            "/auth/sync-profile",
            Some(&user.token),
            Some(json!({ "first_name": "Renamed", "last_name": "Person" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["customer_id"], user.profile["customer_id"]);
    assert_eq!(again["first_name"], "Renamed");
    assert_eq!(again["external_id"], user.subject.as_str());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_patch_me_changes_only_given_names() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;

    let (status, body) = ctx
        .send(
            Method::PATCH,
            "/auth/me",
            Some(&user.token),
            Some(json!({ "last_name": "Lovelace" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Test");
    assert_eq!(body["last_name"], "Lovelace");

    let (_, me) = ctx.send(Method::GET, "/auth/me", Some(&user.token), None).await;
    assert_eq!(me["last_name"], "Lovelace");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_cart_requires_synced_profile() {
    let ctx = TestContext::new().await;
    let token = TestContext::token("test|no-profile-cart", "nobody@example.com");

    let (status, _) = ctx.send(Method::GET, "/cart", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_readiness_with_database() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.send(Method::GET, "/health/ready", None, None).await;

    assert_eq!(status, StatusCode::OK);
}
