//! Integration tests for the shopper cart.
//!
//! Run with: cargo test -p preface-integration-tests --test `cart_flow`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::str::FromStr;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use preface_integration_tests::{TestContext, body_json};

fn decimal(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cart = body_json(resp).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["count"], 0);
    assert_eq!(decimal(&cart["subtotal"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_same_product_and_size_merge() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.add_to_cart("1", "M", 2).await.status(), StatusCode::OK);
    let cart = body_json(ctx.add_to_cart("1", "M", 1).await).await;

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(cart["count"], 3);
    assert_eq!(decimal(&cart["subtotal"]), Decimal::from(135));
    assert_eq!(decimal(&items[0]["line_total"]), Decimal::from(135));
}

#[tokio::test]
async fn test_different_sizes_are_separate_lines() {
    let ctx = TestContext::new().await;

    ctx.add_to_cart("1", "M", 1).await;
    let cart = body_json(ctx.add_to_cart("1", "L", 1).await).await;

    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["count"], 2);

    let count = body_json(ctx.get("/cart/count").await).await;
    assert_eq!(count["count"], 2);
}

#[tokio::test]
async fn test_add_rejects_bad_input() {
    let ctx = TestContext::new().await;

    let resp = ctx.post("/cart/add", &json!({"product_id": "1", "quantity": 1})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["detail"], "Please select a size");

    let resp = ctx.add_to_cart("1", "42", 1).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx.add_to_cart("does-not-exist", "M", 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["detail"], "Product not found");

    let resp = ctx.add_to_cart("1", "M", 0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart = body_json(ctx.get("/cart").await).await;
    assert_eq!(cart["count"], 0);
}

#[tokio::test]
async fn test_update_and_remove() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1", "M", 1).await;
    ctx.add_to_cart("4", "S", 1).await;

    let cart = body_json(
        ctx.post("/cart/update", &json!({"product_id": "1", "size": "M", "quantity": 5}))
            .await,
    )
    .await;
    assert_eq!(cart["count"], 6);

    // Zero or less drops the line.
    let cart = body_json(
        ctx.post("/cart/update", &json!({"product_id": "1", "size": "M", "quantity": 0}))
            .await,
    )
    .await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["product_id"], "4");

    let cart = body_json(ctx.post("/cart/remove", &json!({"product_id": "4", "size": "S"})).await).await;
    assert_eq!(cart["items"], json!([]));

    // Removing a line that is not there is fine.
    let resp = ctx.post("/cart/remove", &json!({"product_id": "4", "size": "S"})).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_clear() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("2", "30", 2).await;

    let resp = ctx.post("/cart/clear", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let cart = body_json(ctx.get("/cart").await).await;
    assert_eq!(cart["count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1", "M", 2).await;

    let other = TestContext::client();
    let cart: serde_json::Value = other.get(ctx.url("/cart")).send().await.unwrap().json().await.unwrap();
    assert_eq!(cart["count"], 0);

    let mine = body_json(ctx.get("/cart").await).await;
    assert_eq!(mine["count"], 2);
}

#[tokio::test]
async fn test_catalog_browsing() {
    let ctx = TestContext::new().await;

    let page = body_json(ctx.get("/products?limit=5").await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["total"], 18);

    let product = body_json(ctx.get("/products/1").await).await;
    let slug = product["slug"].as_str().unwrap().to_string();
    let by_slug = body_json(ctx.get(&format!("/products/slug/{slug}")).await).await;
    assert_eq!(by_slug["id"], "1");

    assert_eq!(ctx.get("/products/999").await.status(), StatusCode::NOT_FOUND);

    let ready = ctx.get("/health/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
}
