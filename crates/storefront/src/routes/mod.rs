//! HTTP route handlers for the storefront.
//!
//! Every endpoint speaks JSON. Errors are `{"detail": "..."}`.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (catalog loaded)
//!
//! # Products
//! GET  /products               - Active products, filtered and paginated
//! GET  /products/{id}          - Product detail
//! GET  /products/slug/{slug}   - Product detail by slug
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart with line totals, count and subtotal
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add item {product_id, size, quantity?}
//! POST /cart/update            - Set quantity {product_id, size, quantity}
//! POST /cart/remove            - Remove line {product_id, size}
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout/summary       - Totals preview (?promotion_code=)
//! POST /checkout               - Place order, then empty the cart
//!
//! # Tracking and promotions
//! GET  /orders/{order_number}  - Order with tracking timeline
//! GET  /promotions/{code}      - Check a promotion code
//!
//! # Admin (session login)
//! POST /admin/auth/login       - Login (rate limited)
//! POST /admin/auth/logout      - Logout
//! GET  /admin/auth/me          - Current admin
//! /admin/api/...               - Products, orders, customers, promotions, analytics
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod promotions;

use axum::{
    Json,
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::middleware::api_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/slug/{slug}", get(products::show_by_slug))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/summary", get(checkout::summary))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let shopper = Router::new()
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .layer(api_rate_limiter());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/products", product_routes())
        .merge(shopper)
        .route("/orders/{order_number}", get(orders::track))
        .route("/promotions/{code}", get(promotions::check))
        .nest("/admin", admin::routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has products.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let products = state.db().products().count_active().await;
    if products == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "products": products })),
        );
    }
    (StatusCode::OK, Json(json!({ "status": "ready", "products": products })))
}
