//! Admin promotion management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use preface_core::{Page, Promotion, PromotionId, PromotionInput};

use super::Message;
use crate::db::PromotionQuery;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// GET /admin/api/promotions
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PromotionQuery>,
) -> Json<Page<Promotion>> {
    Json(state.db().promotions().list(&query).await)
}

/// GET /admin/api/promotions/{id}
#[instrument(skip(state, _admin))]
pub async fn show(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Promotion>> {
    state
        .db()
        .promotions()
        .get(PromotionId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))
}

/// POST /admin/api/promotions
#[instrument(skip(state, _admin, input), fields(code = %input.code))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<PromotionInput>,
) -> Result<(StatusCode, Json<Promotion>)> {
    let promotion = state.db().promotions().create(input).await?;
    tracing::info!(promotion_id = %promotion.id, "Promotion created");
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Replace a promotion's settings. Usage counters are kept.
///
/// PUT /admin/api/promotions/{id}
#[instrument(skip(state, _admin, input))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<PromotionInput>,
) -> Result<Json<Promotion>> {
    let promotion = state.db().promotions().replace(PromotionId::new(id), input).await?;
    Ok(Json(promotion))
}

/// Soft delete: the promotion is deactivated.
///
/// DELETE /admin/api/promotions/{id}
#[instrument(skip(state, _admin))]
pub async fn delete(_admin: RequireAdmin, State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Message>> {
    state.db().promotions().deactivate(PromotionId::new(id)).await?;
    Ok(Json(Message::new("Promotion deleted successfully")))
}
