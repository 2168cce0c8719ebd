//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use preface_core::{Page, Product, ProductId, ProductQuery};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List active products.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ProductQuery>) -> Json<Page<Product>> {
    Json(state.db().products().list(&query).await)
}

/// Show one active product.
///
/// GET /products/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .db()
        .products()
        .get_active(&ProductId::from(id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Show one active product by slug.
///
/// GET /products/slug/{slug}
#[instrument(skip(state))]
pub async fn show_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Product>> {
    state
        .db()
        .products()
        .get_by_slug(&slug)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
