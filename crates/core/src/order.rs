//! Orders placed from a cart snapshot.
//!
//! An order copies everything it needs out of the cart at checkout time. Once
//! placed it no longer refers to the cart or the catalog.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLineItem;
use crate::types::{Email, OrderId, OrderStatus, PaymentStatus, ProductId, round_money};

const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_NUMBER_SUFFIX_LEN: usize = 6;

/// Errors raised by order state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("order {0} has already been delivered")]
    AlreadyDelivered(String),
}

/// Generate an order number of the form `ORD-YYYYMMDD-XXXXXX`.
pub fn generate_order_number<R: Rng + ?Sized>(at: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..ORDER_NUMBER_SUFFIX_LEN)
        .filter_map(|_| ORDER_NUMBER_CHARSET.choose(rng).copied().map(char::from))
        .collect();
    format!("ORD-{}-{suffix}", at.format("%Y%m%d"))
}

/// Where the order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub province: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Contact and delivery details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub shipping: ShippingAddress,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One purchased line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl From<&CartLineItem> for OrderItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            size: line.size.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.line_total(),
        }
    }
}

/// Money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// `subtotal + shipping + tax - discount`, floored at zero and rounded to
    /// cents. Tax is not charged.
    #[must_use]
    pub fn compute(subtotal: Decimal, shipping_cost: Decimal, discount: Decimal) -> Self {
        let tax = Decimal::ZERO;
        let total = round_money(subtotal + shipping_cost + tax - discount).max(Decimal::ZERO);
        Self {
            subtotal,
            shipping_cost,
            tax,
            discount,
            total,
        }
    }
}

/// Admin changes to an order; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
    pub tracking_number: Option<String>,
}

/// A step on the order tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub completed: bool,
    pub current: bool,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(flatten)]
    pub customer: CustomerDetails,
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub promotion_code: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Apply an admin update.
    ///
    /// Entering `Shipped` stamps `shipped_at` and entering `Delivered` stamps
    /// `delivered_at`, each only the first time.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AlreadyDelivered`] when cancelling a delivered
    /// order; nothing is changed in that case.
    pub fn apply_update(&mut self, update: OrderUpdate, now: DateTime<Utc>) -> Result<(), OrderError> {
        if update.status == Some(OrderStatus::Cancelled) && self.status == OrderStatus::Delivered {
            return Err(OrderError::AlreadyDelivered(self.order_number.clone()));
        }

        if let Some(status) = update.status {
            self.status = status;
            match status {
                OrderStatus::Shipped if self.shipped_at.is_none() => self.shipped_at = Some(now),
                OrderStatus::Delivered if self.delivered_at.is_none() => {
                    self.delivered_at = Some(now);
                }
                _ => {}
            }
        }
        if let Some(payment_status) = update.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(notes) = update.notes {
            self.customer.notes = Some(notes);
        }
        if let Some(tracking_number) = update.tracking_number {
            self.tracking_number = Some(tracking_number);
        }
        self.updated_at = Some(now);
        Ok(())
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AlreadyDelivered`] for delivered orders.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        self.apply_update(
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                ..OrderUpdate::default()
            },
            now,
        )
    }

    /// The fulfillment timeline for the tracking page.
    ///
    /// A cancelled order shows only the placement step as completed.
    #[must_use]
    pub fn tracking_steps(&self) -> Vec<TrackingStep> {
        let reached = self.status.timeline_position().unwrap_or(0);
        let current = self.status.timeline_position();

        OrderStatus::TIMELINE
            .iter()
            .enumerate()
            .map(|(i, status)| TrackingStep {
                status: *status,
                label: status.label(),
                completed: i <= reached,
                current: current == Some(i),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn placed_order() -> Order {
        let items = vec![OrderItem {
            product_id: ProductId::from("1"),
            product_name: "Essential Black Tee".to_string(),
            size: "M".to_string(),
            unit_price: Decimal::from(45),
            quantity: 2,
            subtotal: Decimal::from(90),
        }];

        Order {
            id: OrderId::new(1),
            order_number: "ORD-20251012-AB12CD".to_string(),
            customer: CustomerDetails {
                customer_name: "Alex M.".to_string(),
                customer_email: Email::parse("alex@example.com").unwrap(),
                customer_phone: "0812000000".to_string(),
                shipping: ShippingAddress {
                    address: "Jl. Braga 1".to_string(),
                    city: "Bandung".to_string(),
                    province: "Jawa Barat".to_string(),
                    postal_code: None,
                },
                payment_method: Some("bank_transfer".to_string()),
                notes: None,
            },
            items,
            totals: OrderTotals::compute(Decimal::from(90), Decimal::ZERO, Decimal::ZERO),
            promotion_code: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            tracking_number: None,
            created_at: Utc.with_ymd_and_hms(2025, 10, 12, 9, 0, 0).unwrap(),
            updated_at: None,
            shipped_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn test_order_number_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let at = Utc.with_ymd_and_hms(2025, 10, 12, 9, 0, 0).unwrap();
        let number = generate_order_number(at, &mut rng);

        assert!(number.starts_with("ORD-20251012-"));
        let suffix = number.trim_start_matches("ORD-20251012-");
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_totals() {
        let totals = OrderTotals::compute(Decimal::from(135), Decimal::from(10), Decimal::new(1350, 2));
        assert_eq!(totals.total, Decimal::new(13_150, 2));
        assert_eq!(totals.tax, Decimal::ZERO);

        let floored = OrderTotals::compute(Decimal::from(5), Decimal::ZERO, Decimal::from(20));
        assert_eq!(floored.total, Decimal::ZERO);
    }

    #[test]
    fn test_item_from_cart_line() {
        let line = CartLineItem {
            product_id: ProductId::from("3"),
            name: "Shadow Runner Sneakers".to_string(),
            image: "/assets/product-shoes.jpg".to_string(),
            size: "10".to_string(),
            unit_price: Decimal::from(120),
            quantity: 2,
        };
        let item = OrderItem::from(&line);
        assert_eq!(item.subtotal, Decimal::from(240));
        assert_eq!(item.product_name, "Shadow Runner Sneakers");
    }

    #[test]
    fn test_shipping_stamps_once() {
        let mut order = placed_order();
        let first = Utc.with_ymd_and_hms(2025, 10, 13, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 10, 14, 9, 0, 0).unwrap();

        order
            .apply_update(
                OrderUpdate {
                    status: Some(OrderStatus::Shipped),
                    tracking_number: Some("JNE1234567890".to_string()),
                    ..OrderUpdate::default()
                },
                first,
            )
            .unwrap();
        order
            .apply_update(
                OrderUpdate {
                    status: Some(OrderStatus::Shipped),
                    ..OrderUpdate::default()
                },
                later,
            )
            .unwrap();

        assert_eq!(order.shipped_at, Some(first));
        assert_eq!(order.tracking_number.as_deref(), Some("JNE1234567890"));
        assert_eq!(order.updated_at, Some(later));
    }

    #[test]
    fn test_delivered_order_cannot_be_cancelled() {
        let mut order = placed_order();
        order
            .apply_update(
                OrderUpdate {
                    status: Some(OrderStatus::Delivered),
                    payment_status: Some(PaymentStatus::Paid),
                    ..OrderUpdate::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert!(order.delivered_at.is_some());
        assert!(matches!(
            order.cancel(Utc::now()),
            Err(OrderError::AlreadyDelivered(_))
        ));
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_tracking_steps() {
        let mut order = placed_order();
        order.status = OrderStatus::Shipped;

        let steps = order.tracking_steps();
        assert_eq!(steps.len(), 4);
        assert!(steps[0].completed && steps[1].completed && steps[2].completed);
        assert!(!steps[3].completed);
        assert!(steps[2].current);

        order.status = OrderStatus::Cancelled;
        let steps = order.tracking_steps();
        assert!(steps[0].completed);
        assert!(steps.iter().skip(1).all(|s| !s.completed));
        assert!(steps.iter().all(|s| !s.current));
    }

    #[test]
    fn test_order_serializes_flat() {
        let json = serde_json::to_value(placed_order()).unwrap();
        assert_eq!(json["customer_email"], "alex@example.com");
        assert_eq!(json["shipping"]["city"], "Bandung");
        assert_eq!(json["status"], "pending");
        assert!(json.get("total").is_some());
    }
}
