//! Checkout route handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use preface_core::Order;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::services::checkout::{CheckoutRequest, CheckoutService, CheckoutSummary};
use crate::state::AppState;

/// Query for the checkout summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub promotion_code: Option<String>,
}

fn checkout(state: &AppState) -> CheckoutService<'_> {
    CheckoutService::new(state.db(), state.config().shipping_flat_rate)
}

/// Price the session's cart.
///
/// GET /checkout/summary
#[instrument(skip(state, cart))]
pub async fn summary(
    State(state): State<AppState>,
    cart: SessionCart,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<CheckoutSummary>> {
    let summary = checkout(&state)
        .summary(&cart, query.promotion_code.as_deref())
        .await?;
    Ok(Json(summary))
}

/// Place an order for the session's cart, then empty the cart.
///
/// POST /checkout
#[instrument(skip(state, cart, request))]
pub async fn place_order(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = checkout(&state).place_order(&cart, request).await?;

    cart.clear();
    let cart_saved = cart.save().await;

    Ok(placed(order, cart_saved))
}

/// Response for a committed order. A failed cart write is logged only.
fn placed(order: Order, cart_saved: Result<()>) -> (StatusCode, Json<Order>) {
    if let Err(e) = cart_saved {
        tracing::error!(order_number = %order.order_number, error = %e, "Failed to clear cart after checkout");
    }

    add_breadcrumb("checkout", "Placed order", &[("order_number", &order.order_number)]);

    (StatusCode::CREATED, Json(order))
}
