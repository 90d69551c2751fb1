//! Catalog route handlers. Public: no token required.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use emporium_core::ProductId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::Product;
use crate::services::{CatalogService, ProductDraft, ProductDraftPatch};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub is_active: Option<bool>,
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool())
        .list(query.page, query.limit, query.is_active)
        .await?;
    Ok(Json(products))
}

#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.pool()).create(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

#[instrument(skip(state, patch))]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductDraftPatch>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).update(id, patch).await?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    CatalogService::new(state.pool()).remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
