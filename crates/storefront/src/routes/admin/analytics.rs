//! Admin dashboard analytics.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use preface_core::Order;

use crate::middleware::RequireAdmin;
use crate::services::analytics::{AnalyticsService, DashboardStats, SalesPoint, TopProduct};
use crate::state::AppState;

const DEFAULT_CHART_DAYS: u32 = 30;
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    fn clamped(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// GET /admin/api/analytics/dashboard
#[instrument(skip(state, _admin))]
pub async fn dashboard(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DashboardStats> {
    Json(AnalyticsService::new(state.db()).dashboard().await)
}

/// GET /admin/api/analytics/sales-chart
#[instrument(skip(state, _admin))]
pub async fn sales_chart(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Json<Vec<SalesPoint>> {
    let days = query.days.unwrap_or(DEFAULT_CHART_DAYS);
    Json(AnalyticsService::new(state.db()).sales_chart(days).await)
}

/// GET /admin/api/analytics/top-products
#[instrument(skip(state, _admin))]
pub async fn top_products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<TopProduct>> {
    Json(AnalyticsService::new(state.db()).top_products(query.clamped()).await)
}

/// GET /admin/api/analytics/recent-orders
#[instrument(skip(state, _admin))]
pub async fn recent_orders(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Order>> {
    Json(state.db().orders().recent(query.clamped()).await)
}
