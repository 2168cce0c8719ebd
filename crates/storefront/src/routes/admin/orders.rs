//! Admin order management.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use preface_core::{Order, OrderId, OrderUpdate, Page};

use super::Message;
use crate::db::OrderQuery;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// GET /admin/api/orders
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Json<Page<Order>> {
    Json(state.db().orders().list(&query).await)
}

/// GET /admin/api/orders/{id}
#[instrument(skip(state, _admin))]
pub async fn show(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Order>> {
    state
        .db()
        .orders()
        .get(OrderId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Update status, payment status, notes or tracking number.
///
/// PUT /admin/api/orders/{id}
#[instrument(skip(state, _admin))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(update): Json<OrderUpdate>,
) -> Result<Json<Order>> {
    let order = state.db().orders().update(OrderId::new(id), update).await?;
    tracing::info!(
        order_number = %order.order_number,
        status = %order.status,
        "Order updated"
    );
    Ok(Json(order))
}

/// Orders are never removed; deleting one cancels it.
///
/// DELETE /admin/api/orders/{id}
#[instrument(skip(state, _admin))]
pub async fn cancel(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Message>> {
    let order = state.db().orders().cancel(OrderId::new(id)).await?;
    tracing::info!(order_number = %order.order_number, "Order cancelled");
    Ok(Json(Message::new("Order cancelled successfully")))
}
