//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness
//! GET    /health/ready              - Readiness (database ping)
//!
//! # Profile (bearer token)
//! POST   /auth/sync-profile         - Create or refresh the caller's profile
//! GET    /auth/me                   - Caller's profile
//! PATCH  /auth/me                   - Update names
//!
//! # Cart (bearer token)
//! GET    /cart                      - Priced cart view
//! DELETE /cart                      - Remove every line
//! POST   /cart/items                - Add a product
//! PUT    /cart/items/{product_id}   - Set quantity (0 removes)
//! DELETE /cart/items/{product_id}   - Remove a product
//!
//! # Orders (bearer token)
//! POST   /orders                    - Check out the cart
//! GET    /orders                    - Order history
//! GET    /orders/{order_id}         - Order detail
//!
//! # Catalog (public)
//! GET    /products                  - Paginated listing
//! POST   /products                  - Create
//! GET    /products/{id}             - Detail
//! PUT    /products/{id}             - Partial update
//! DELETE /products/{id}             - Hard delete
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router, middleware,
    http::{Request, Response, StatusCode},
    routing::{get, post, put},
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{Identity, request_id_middleware, security_headers_middleware};
use crate::models::Customer;
use crate::services::IdentityService;
use crate::state::AppState;

/// Resolve the token subject to a local customer.
///
/// Handlers call this after validating their input so malformed requests
/// are rejected without a database round trip.
pub(crate) async fn current_customer(
    state: &AppState,
    identity: &Identity,
) -> Result<Customer, AppError> {
    Ok(IdentityService::new(state.pool())
        .resolve(&identity.subject)
        .await?)
}

/// Create the profile routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sync-profile", post(auth::sync_profile))
        .route("/me", get(auth::me).patch(auth::update_me))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get_cart).delete(cart::clear_cart))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create_order).get(orders::list_orders))
        .route("/{order_id}", get(orders::get_order))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

/// All storefront routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// The complete application: routes, middleware, and state.
///
/// Sentry layers are added by the binary so tests can build the same stack
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    let timeout = state.config().request_timeout;

    routes()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        subject = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
