//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use emporium_core::OrderId;

use super::current_customer;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireIdentity;
use crate::models::{Order, OrderSummary};
use crate::services::{CheckoutAddresses, OrderService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    pub billing_address: String,
}

/// Check out the caller's cart.
#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn create_order(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let addresses = CheckoutAddresses::new(&body.shipping_address, &body.billing_address)?;
    let customer = current_customer(&state, &identity).await?;
    let order = OrderService::new(state.pool())
        .create_order(customer.id, &addresses)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<Vec<OrderSummary>>> {
    let customer = current_customer(&state, &identity).await?;
    let orders = OrderService::new(state.pool())
        .list_orders(customer.id)
        .await?;
    Ok(Json(orders))
}

#[instrument(skip_all, fields(subject = %identity.subject, %order_id))]
pub async fn get_order(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(order_id): ApiPath<OrderId>,
) -> Result<Json<Order>> {
    let customer = current_customer(&state, &identity).await?;
    let order = OrderService::new(state.pool())
        .get_order_by_id(customer.id, order_id)
        .await?;
    Ok(Json(order))
}
