//! Public promotion lookup.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::instrument;

use preface_core::Promotion;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Look up a promotion code and check that it can be used right now.
///
/// GET /promotions/{code}
///
/// Unknown codes are 404; inactive, expired, not yet started or used-up
/// promotions are 400. Minimum purchase and per-customer limits are only
/// checked at checkout.
#[instrument(skip(state))]
pub async fn check(State(state): State<AppState>, Path(code): Path<String>) -> Result<Json<Promotion>> {
    let promotion = state
        .db()
        .promotions()
        .get_by_code(&code)
        .await
        .ok_or_else(|| AppError::NotFound("Promotion code not found".to_string()))?;

    promotion.check_available(Utc::now())?;
    Ok(Json(promotion))
}
