//! Admin API route handlers.
//!
//! Every handler except login requires [`RequireAdmin`](crate::middleware::RequireAdmin).

pub mod analytics;
pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;
pub mod promotions;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// `skip`/`limit` pagination for listings without other filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Create the admin auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login).layer(auth_rate_limiter()))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the admin API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show).put(products::update).delete(products::delete),
        )
        .route("/orders", get(orders::index))
        .route(
            "/orders/{id}",
            get(orders::show).put(orders::update).delete(orders::cancel),
        )
        .route("/customers", get(customers::index).post(customers::create))
        .route("/customers/{id}", get(customers::show))
        .route("/promotions", get(promotions::index).post(promotions::create))
        .route(
            "/promotions/{id}",
            get(promotions::show).put(promotions::update).delete(promotions::delete),
        )
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/sales-chart", get(analytics::sales_chart))
        .route("/analytics/top-products", get(analytics::top_products))
        .route("/analytics/recent-orders", get(analytics::recent_orders))
}

/// Create all admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
}
