//! Checkout service.
//!
//! Checkout reads the session's cart snapshot, re-validates each line against
//! the catalog and turns it into an order. Lines are charged at the unit price
//! captured when they were added to the cart.
//!
//! Placing an order holds the store's write lock from validation to insert,
//! so a failed checkout leaves stock, promotions and customers untouched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use preface_core::order::generate_order_number;
use preface_core::{
    CartStore, CustomerDetails, NewCustomer, Order, OrderItem, OrderStatus, OrderTotals, PaymentStatus, ProductId,
    PromotionError, PromotionKind,
};

use crate::db::{Database, Tables};

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0} is no longer available")]
    ProductUnavailable(String),

    #[error("{name} is not available in size {size}")]
    SizeUnavailable { name: String, size: String },

    #[error("Insufficient stock for {name} ({available} left)")]
    InsufficientStock { name: String, available: u32 },

    #[error("Invalid promotion code")]
    UnknownPromotion,

    #[error(transparent)]
    Promotion(#[from] PromotionError),

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Body of `POST /checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub customer: CustomerDetails,
    #[serde(default)]
    pub promotion_code: Option<String>,
}

impl CheckoutRequest {
    fn validate(&self) -> Result<(), CheckoutError> {
        let details = &self.customer;
        let required = [
            ("customer_name", details.customer_name.as_str()),
            ("customer_phone", details.customer_phone.as_str()),
            ("address", details.shipping.address.as_str()),
            ("city", details.shipping.city.as_str()),
            ("province", details.shipping.province.as_str()),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CheckoutError::MissingField(*field)),
            None => Ok(()),
        }
    }
}

/// The promotion applied to a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPromotion {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    pub free_shipping: bool,
}

/// Priced view of a cart, before the order exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub items: Vec<OrderItem>,
    pub item_count: u64,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub promotion: Option<AppliedPromotion>,
}

/// Checkout over the shared store.
pub struct CheckoutService<'a> {
    db: &'a Database,
    shipping_flat_rate: Decimal,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(db: &'a Database, shipping_flat_rate: Decimal) -> Self {
        Self { db, shipping_flat_rate }
    }

    /// Price the cart without placing an order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart cannot be checked out as it stands.
    pub async fn summary(&self, cart: &CartStore, promotion_code: Option<&str>) -> Result<CheckoutSummary, CheckoutError> {
        let tables = self.db.read().await;
        price_cart(&tables, cart, promotion_code, None, self.shipping_flat_rate, Utc::now())
    }

    /// Place an order for the cart.
    ///
    /// The caller clears the cart once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if any line or the promotion fails validation.
    /// Nothing is changed in that case.
    pub async fn place_order(&self, cart: &CartStore, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        let mut tables = self.db.write().await;
        place_order(&mut tables, cart, request, self.shipping_flat_rate, Utc::now(), &mut rand::rng())
    }
}

/// Validate every cart line and compute totals. Read-only.
fn price_cart(
    tables: &Tables,
    cart: &CartStore,
    promotion_code: Option<&str>,
    customer: Option<&CustomerDetails>,
    shipping_flat_rate: Decimal,
    now: DateTime<Utc>,
) -> Result<CheckoutSummary, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut units_by_product: HashMap<&ProductId, u64> = HashMap::new();
    for line in cart.items() {
        let product = tables
            .catalog
            .get_active(&line.product_id)
            .ok_or_else(|| CheckoutError::ProductUnavailable(line.name.clone()))?;
        if !product.offers_size(&line.size) {
            return Err(CheckoutError::SizeUnavailable {
                name: product.name.clone(),
                size: line.size.clone(),
            });
        }

        let units = units_by_product.entry(&line.product_id).or_insert(0);
        *units += u64::from(line.quantity);
        if *units > u64::from(product.stock) {
            return Err(CheckoutError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
            });
        }
    }

    let items: Vec<OrderItem> = cart.items().iter().map(OrderItem::from).collect();
    let subtotal = cart.subtotal();

    let promotion = match promotion_code.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => {
            let promotion = tables.promotion_by_code(code).ok_or(CheckoutError::UnknownPromotion)?;
            let uses_by_customer = customer.map_or(0, |details| promotion_uses_by(tables, &promotion.code, details));
            promotion.check(now, subtotal, uses_by_customer)?;
            Some(promotion)
        }
        None => None,
    };

    let discount = promotion.map(|p| p.discount_for(subtotal));
    let free_shipping = discount.is_some_and(|d| d.free_shipping);
    let shipping = if free_shipping { Decimal::ZERO } else { shipping_flat_rate };
    let totals = OrderTotals::compute(subtotal, shipping, discount.map_or(Decimal::ZERO, |d| d.amount));

    Ok(CheckoutSummary {
        items,
        item_count: cart.count(),
        totals,
        promotion: promotion.map(|p| AppliedPromotion {
            code: p.code.clone(),
            kind: p.kind,
            free_shipping,
        }),
    })
}

/// Orders this customer already placed with `code`, ignoring cancelled ones.
fn promotion_uses_by(tables: &Tables, code: &str, customer: &CustomerDetails) -> u32 {
    let uses = tables
        .orders
        .values()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .filter(|o| o.customer.customer_email == customer.customer_email)
        .filter(|o| o.promotion_code.as_deref() == Some(code))
        .count();
    u32::try_from(uses).unwrap_or(u32::MAX)
}

/// Validate, then apply every effect of a checkout.
fn place_order<R: Rng + ?Sized>(
    tables: &mut Tables,
    cart: &CartStore,
    request: CheckoutRequest,
    shipping_flat_rate: Decimal,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Order, CheckoutError> {
    request.validate()?;
    let summary = price_cart(
        tables,
        cart,
        request.promotion_code.as_deref(),
        Some(&request.customer),
        shipping_flat_rate,
        now,
    )?;

    // Everything below is infallible; validation is done.
    for item in &summary.items {
        if let Some(product) = tables.catalog.get_mut(&item.product_id) {
            product.stock = product.stock.saturating_sub(item.quantity);
        }
    }

    let promotion_code = summary.promotion.as_ref().map(|p| p.code.clone());
    if let Some(code) = &promotion_code
        && let Some(promotion) = tables.promotion_by_code_mut(code)
    {
        promotion.record_use();
    }

    tables.record_customer_order(NewCustomer::from(&request.customer), summary.totals.total, now);

    let order_number = loop {
        let candidate = generate_order_number(now, rng);
        if !tables.orders.values().any(|o| o.order_number == candidate) {
            break candidate;
        }
    };

    let order = Order {
        id: tables.next_order_id(),
        order_number,
        customer: request.customer,
        items: summary.items,
        totals: summary.totals,
        promotion_code,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        tracking_number: None,
        created_at: now,
        updated_at: None,
        shipped_at: None,
        delivered_at: None,
    };
    tables.orders.insert(order.id, order.clone());

    tracing::info!(
        order_number = %order.order_number,
        total = %order.totals.total,
        items = order.items.len(),
        "Order placed"
    );

    Ok(order)
}
