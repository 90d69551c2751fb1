//! Integration tests for the catalog endpoints.
//!
//! Requires a `PostgreSQL` database in `TEST_DATABASE_URL`.
//! Run with: cargo test -p emporium-integration-tests -- --ignored

use emporium_integration_tests::TestContext;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_product_lifecycle() {
    let ctx = TestContext::new().await;

    let (status, created) = ctx
        .send(
            Method::POST,
            "/products",
            None,
            Some(json!({
                "name": "Lifecycle Mug",
                "description": "350ml",
                "price": 12.5,
                "stock_quantity": 4,
                "image_url": "https://images.example.com/mug.jpg",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], "12.50");
    assert_eq!(created["is_active"], true);
    let id = created["product_id"].as_i64().unwrap_or_default();

    let (status, updated) = ctx
        .send(
            Method::PUT,
            &format!("/products/{id}"),
            None,
            Some(json!({ "price": "9.99", "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "9.99");
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["name"], "Lifecycle Mug");
    assert_eq!(updated["description"], "350ml");

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .send(Method::GET, &format!("/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Product with ID \"{id}\" not found"));

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_list_pagination_and_filter() {
    let ctx = TestContext::new().await;
    ctx.product("1.00", 1).await;
    ctx.product("2.00", 1).await;

    let (status, page) = ctx
        .send(Method::GET, "/products?page=1&limit=2", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().map(Vec::len), Some(2));

    let (_, capped) = ctx
        .send(Method::GET, "/products?limit=1000", None, None)
        .await;
    assert!(capped.as_array().map_or(0, Vec::len) <= 100);

    let (_, inactive) = ctx
        .send(Method::GET, "/products?is_active=false&limit=100", None, None)
        .await;
    let all_inactive = inactive
        .as_array()
        .into_iter()
        .flatten()
        .all(|p| p["is_active"] == false);
    assert!(all_inactive);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_update_missing_product_is_not_found() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .send(
            Method::PUT,
            "/products/2147483000",
            None,
            Some(json!({ "name": "Ghost" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
