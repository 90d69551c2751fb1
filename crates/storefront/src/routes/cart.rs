//! Cart route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use emporium_core::ProductId;

use super::current_customer;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireIdentity;
use crate::models::CartView;
use crate::services::CartService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// Parse a quantity into the domain type. The upper bound is the largest
/// value a cart line can store.
fn quantity(raw: i64, min: i64, message: &str) -> Result<u32> {
    if raw < min {
        return Err(AppError::BadRequest(message.to_string()));
    }
    i32::try_from(raw)
        .ok()
        .and_then(|q| u32::try_from(q).ok())
        .ok_or_else(|| AppError::BadRequest("Quantity is too large".to_string()))
}

#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn get_cart(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<CartView>> {
    let customer = current_customer(&state, &identity).await?;
    let cart = CartService::new(state.pool())
        .get_or_create_cart(customer.id)
        .await?;
    Ok(Json(cart))
}

#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiJson(body): ApiJson<AddItemRequest>,
) -> Result<Json<CartView>> {
    let qty = quantity(body.quantity, 1, "Quantity must be at least 1")?;
    let customer = current_customer(&state, &identity).await?;
    let cart = CartService::new(state.pool())
        .add_item(customer.id, body.product_id, qty)
        .await?;
    Ok(Json(cart))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip_all, fields(subject = %identity.subject, %product_id))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let qty = quantity(
        body.quantity,
        0,
        "Quantity must be at least 0. Use 0 to remove the item.",
    )?;
    let customer = current_customer(&state, &identity).await?;
    let cart = CartService::new(state.pool())
        .update_item_quantity(customer.id, product_id, qty)
        .await?;
    Ok(Json(cart))
}

#[instrument(skip_all, fields(subject = %identity.subject, %product_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<CartView>> {
    let customer = current_customer(&state, &identity).await?;
    let cart = CartService::new(state.pool())
        .remove_item(customer.id, product_id)
        .await?;
    Ok(Json(cart))
}

#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn clear_cart(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<CartView>> {
    let customer = current_customer(&state, &identity).await?;
    let cart = CartService::new(state.pool()).clear_cart(customer.id).await?;
    Ok(Json(cart))
}
