//! Cart route handlers.
//!
//! The cart lives in the session (see [`SessionCart`]). Every mutating
//! handler saves the cart back and answers with the full cart view, so the
//! client never has to compute a count or subtotal itself.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use preface_core::{CartLineItem, CartStore, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;

/// One cart line with its computed total.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLineItem,
    pub line_total: Decimal,
}

/// Cart as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub count: u64,
    pub subtotal: Decimal,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartLineView {
                    line_total: line.line_total(),
                    line: line.clone(),
                })
                .collect(),
            count: cart.count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    /// Defaults to 1 when absent.
    pub quantity: Option<i64>,
}

/// Update quantity request. A quantity of zero or below removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: String,
    pub size: String,
}

/// Show the cart.
///
/// GET /cart
#[instrument(skip(cart))]
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(CartView::from(&*cart))
}

/// Cart badge count.
///
/// GET /cart/count
#[instrument(skip(cart))]
pub async fn count(cart: SessionCart) -> Json<CartCount> {
    Json(CartCount { count: cart.count() })
}

/// Add an item to the cart.
///
/// POST /cart/add
///
/// Unknown or inactive products are 404. A size the product does not offer
/// (including no size at all) and a quantity below 1 are 400.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }

    let product = state
        .db()
        .products()
        .get_active(&ProductId::from(request.product_id.as_str()))
        .await
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let size = request.size.trim();
    if size.is_empty() {
        return Err(AppError::BadRequest("Please select a size".to_string()));
    }
    let candidate = product.candidate(size).ok_or_else(|| {
        AppError::BadRequest(format!("{} is not available in size {size}", product.name))
    })?;

    cart.add_item(candidate, u32::try_from(quantity).unwrap_or(u32::MAX));
    cart.save().await?;

    add_breadcrumb(
        "cart",
        "Added item",
        &[("product_id", product.id.as_str()), ("size", size)],
    );

    Ok(Json(CartView::from(&*cart)))
}

/// Set the quantity of a cart line.
///
/// POST /cart/update
#[instrument(skip(cart))]
pub async fn update(mut cart: SessionCart, Json(request): Json<UpdateCartRequest>) -> Result<Json<CartView>> {
    cart.update_quantity(&ProductId::from(request.product_id), &request.size, request.quantity);
    cart.save().await?;
    Ok(Json(CartView::from(&*cart)))
}

/// Remove a cart line.
///
/// POST /cart/remove
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, Json(request): Json<RemoveFromCartRequest>) -> Result<Json<CartView>> {
    cart.remove_item(&ProductId::from(request.product_id), &request.size);
    cart.save().await?;
    Ok(Json(CartView::from(&*cart)))
}

/// Empty the cart.
///
/// POST /cart/clear
#[instrument(skip(cart))]
pub async fn clear(mut cart: SessionCart) -> Result<StatusCode> {
    cart.clear();
    cart.save().await?;
    Ok(StatusCode::NO_CONTENT)
}
