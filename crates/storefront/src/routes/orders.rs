//! Order tracking route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use preface_core::{Order, TrackingStep};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// An order with its tracking timeline.
#[derive(Debug, Clone, Serialize)]
pub struct OrderTracking {
    #[serde(flatten)]
    pub order: Order,
    pub tracking_steps: Vec<TrackingStep>,
}

impl From<Order> for OrderTracking {
    fn from(order: Order) -> Self {
        Self {
            tracking_steps: order.tracking_steps(),
            order,
        }
    }
}

/// Track an order by its number.
///
/// GET /orders/{order_number}
#[instrument(skip(state))]
pub async fn track(State(state): State<AppState>, Path(order_number): Path<String>) -> Result<Json<OrderTracking>> {
    state
        .db()
        .orders()
        .get_by_number(&order_number)
        .await
        .map(|order| Json(OrderTracking::from(order)))
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}
