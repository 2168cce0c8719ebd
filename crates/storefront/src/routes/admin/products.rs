//! Admin product management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use preface_core::{NewProduct, Page, Product, ProductId, ProductQuery, ProductUpdate};

use super::Message;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Admin-only listing flag, read from the same query string as the filters.
#[derive(Debug, Deserialize)]
pub struct InactiveFlag {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /admin/api/products
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(mut filters): Query<ProductQuery>,
    Query(flag): Query<InactiveFlag>,
) -> Json<Page<Product>> {
    filters.include_inactive = flag.include_inactive;
    Json(state.db().products().list(&filters).await)
}

/// GET /admin/api/products/{id}
#[instrument(skip(state, _admin))]
pub async fn show(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .db()
        .products()
        .get(&ProductId::from(id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// POST /admin/api/products
#[instrument(skip(state, _admin, product), fields(name = %product.name))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.db().products().create(product).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /admin/api/products/{id}
#[instrument(skip(state, _admin, update))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    let product = state.db().products().update(&ProductId::from(id), update).await?;
    Ok(Json(product))
}

/// Soft delete: the product is deactivated and disappears from the storefront.
///
/// DELETE /admin/api/products/{id}
#[instrument(skip(state, _admin))]
pub async fn delete(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Message>> {
    state.db().products().deactivate(&ProductId::from(id)).await?;
    Ok(Json(Message::new("Product deleted successfully")))
}
