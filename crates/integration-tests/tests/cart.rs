//! Integration tests for the cart engine.
//!
//! Requires a `PostgreSQL` database in `TEST_DATABASE_URL`.
//! Run with: cargo test -p emporium-integration-tests -- --ignored

use emporium_integration_tests::TestContext;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_new_cart_is_empty() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;

    let (status, cart) = ctx.send(Method::GET, "/cart", Some(&user.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["total_items"], 0);
    assert_eq!(cart["grand_total"], "0.00");
    assert!(cart["cart_id"].is_string());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_adding_twice_increments_quantity() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let product = ctx.product("10.00", 10).await;

    ctx.add_to_cart(&user, product, 1).await;
    let cart = ctx.add_to_cart(&user, product, 2).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["items"][0]["subtotal"], "30.00");
    assert_eq!(cart["total_items"], 3);
    assert_eq!(cart["grand_total"], "30.00");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_update_respects_stock() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let product = ctx.product("4.00", 5).await;
    let path = format!("/cart/items/{product}");

    ctx.add_to_cart(&user, product, 3).await;

    let (status, cart) = ctx
        .send(Method::PUT, &path, Some(&user.token), Some(json!({ "quantity": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], 5);

    let (status, body) = ctx
        .send(Method::PUT, &path, Some(&user.token), Some(json!({ "quantity": 6 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("Available: 5")));

    let (_, cart) = ctx.send(Method::GET, "/cart", Some(&user.token), None).await;
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(ctx.stock(product).await, 5);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_update_to_zero_removes_item() {
    // add needs quantity >= 1 but update accepts 0 as "remove"
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let product = ctx.product("4.00", 5).await;
    ctx.add_to_cart(&user, product, 2).await;

    let (status, cart) = ctx
        .send(
            Method::PUT,
            &format!("/cart/items/{product}"),
            Some(&user.token),
            Some(json!({ "quantity": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_add_rejects_unavailable_products() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let product = ctx.product("4.00", 2).await;

    let (status, _) = ctx
        .send(
            Method::POST,
            "/cart/items",
            Some(&user.token),
            Some(json!({ "product_id": product, "quantity": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.send(
        Method::PUT,
        &format!("/products/{product}"),
        None,
        Some(json!({ "is_active": false })),
    )
    .await;
    let (status, body) = ctx
        .send(
            Method::POST,
            "/cart/items",
            Some(&user.token),
            Some(json!({ "product_id": product, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|m| m.ends_with("is not available.")));

    let (status, _) = ctx
        .send(
            Method::POST,
            "/cart/items",
            Some(&user.token),
            Some(json!({ "product_id": 2_147_483_000, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let first = ctx.product("1.00", 5).await;
    let second = ctx.product("2.00", 5).await;
    ctx.add_to_cart(&user, first, 1).await;
    ctx.add_to_cart(&user, second, 1).await;

    let (status, cart) = ctx
        .send(Method::DELETE, &format!("/cart/items/{first}"), Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/cart/items/{first}"), Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, cart) = ctx.send(Method::DELETE, "/cart", Some(&user.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_carts_are_per_customer() {
    let ctx = TestContext::new().await;
    let alice = ctx.user().await;
    let bob = ctx.user().await;
    let product = ctx.product("3.00", 5).await;

    ctx.add_to_cart(&alice, product, 2).await;

    let (_, bobs) = ctx.send(Method::GET, "/cart", Some(&bob.token), None).await;
    assert_eq!(bobs["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_merged_quantity_must_fit_line() {
    let ctx = TestContext::new().await;
    let user = ctx.user().await;
    let product = ctx.product("0.01", 2_000_000_000).await;

    ctx.add_to_cart(&user, product, 2_000_000_000).await;
    let (status, body) = ctx
        .send(
            Method::POST,
            "/cart/items",
            Some(&user.token),
            Some(json!({ "product_id": product, "quantity": 2_000_000_000 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["message"], "Quantity is too large");
    let (_, cart) = ctx.send(Method::GET, "/cart", Some(&user.token), None).await;
    assert_eq!(cart["items"][0]["quantity"], 2_000_000_000);
}
