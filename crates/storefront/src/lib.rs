//! PREFACE storefront library.
//!
//! JSON API for the PREFACE streetwear store: catalog, session cart,
//! checkout, order tracking, and the admin API. All data lives in memory for
//! the lifetime of the process.
//!
//! The binary in `main.rs` wires configuration, logging and Sentry around
//! [`build_app`]; tests drive the same router in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, Request, Response, header},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::config::StorefrontConfig;
use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Build the full application router with every middleware layer.
pub fn build_app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let cors = build_cors(state.config());

    routes::routes()
        .layer(session_layer)
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for the configured origins. The session cookie travels with
/// cross-origin requests, so origins are never wildcarded.
fn build_cors(config: &StorefrontConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::{Body, to_bytes};
    use tower::ServiceExt;

    use super::*;
    use crate::db::Database;

    fn app() -> Router {
        let hash = services::auth::hash_password("correct horse battery").unwrap();
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_string()),
            "STOREFRONT_CORS_ORIGINS" => Some("https://shop.preface.store".to_string()),
            "ADMIN_USERNAME" => Some("admin".to_string()),
            "ADMIN_PASSWORD_HASH" => Some(hash.clone()),
            _ => None,
        })
        .unwrap();
        build_app(AppState::new(config, Database::seeded(None).unwrap()))
    }

    #[tokio::test]
    async fn test_health_and_headers() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert!(headers.contains_key("x-request-id"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let response = app()
            .oneshot(
                Request::get("/health/ready")
                    .header("x-request-id", "edge-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["x-request-id"], "edge-42");
    }

    #[tokio::test]
    async fn test_admin_requires_session() {
        let response = app()
            .oneshot(Request::get("/admin/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Not authenticated");
    }

    #[tokio::test]
    async fn test_cors_only_configured_origins() {
        let preflight = |origin: &'static str| {
            Request::options("/cart/add")
                .header("origin", origin)
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app().oneshot(preflight("https://shop.preface.store")).await.unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "https://shop.preface.store"
        );
        assert_eq!(allowed.headers()["access-control-allow-credentials"], "true");

        let denied = app().oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(!denied.headers().contains_key("access-control-allow-origin"));
    }
}
