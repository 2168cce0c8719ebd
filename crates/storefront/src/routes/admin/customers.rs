//! Admin customer management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use preface_core::{Customer, CustomerId, NewCustomer, Page};

use super::ListQuery;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// GET /admin/api/customers
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<Customer>> {
    Json(state.db().customers().list(query.skip, query.limit).await)
}

/// GET /admin/api/customers/{id}
#[instrument(skip(state, _admin))]
pub async fn show(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Customer>> {
    state
        .db()
        .customers()
        .get(CustomerId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
}

/// POST /admin/api/customers
#[instrument(skip(state, _admin, customer))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(customer): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>)> {
    if customer.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    let customer = state.db().customers().create(customer).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}
