//! Customer records.
//!
//! Customers are created by the admin API or upserted by email when an order
//! is placed. Order counters are kept on the record so listings stay cheap.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::{CustomerDetails, ShippingAddress};
use crate::types::{CustomerId, Email};

/// Input for creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl From<&CustomerDetails> for NewCustomer {
    fn from(details: &CustomerDetails) -> Self {
        let ShippingAddress {
            address,
            city,
            province,
            postal_code,
        } = &details.shipping;
        Self {
            name: details.customer_name.clone(),
            email: details.customer_email.clone(),
            phone: Some(details.customer_phone.clone()),
            address: Some(address.clone()),
            city: Some(city.clone()),
            province: Some(province.clone()),
            postal_code: postal_code.clone(),
        }
    }
}

/// A customer and their order history counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub total_orders: u32,
    pub total_spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_order_at: Option<DateTime<Utc>>,
}

impl Customer {
    #[must_use]
    pub fn new(id: CustomerId, input: NewCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            city: input.city,
            province: input.province,
            postal_code: input.postal_code,
            total_orders: 0,
            total_spent: Decimal::ZERO,
            created_at: now,
            updated_at: None,
            last_order_at: None,
        }
    }

    /// Refresh contact details from a newer order. The email never changes.
    pub fn refresh_contact(&mut self, input: NewCustomer, now: DateTime<Utc>) {
        self.name = input.name;
        self.phone = input.phone.or_else(|| self.phone.take());
        self.address = input.address.or_else(|| self.address.take());
        self.city = input.city.or_else(|| self.city.take());
        self.province = input.province.or_else(|| self.province.take());
        self.postal_code = input.postal_code.or_else(|| self.postal_code.take());
        self.updated_at = Some(now);
    }

    /// Count a placed order.
    pub fn record_order(&mut self, total: Decimal, at: DateTime<Utc>) {
        self.total_orders = self.total_orders.saturating_add(1);
        self.total_spent += total;
        self.last_order_at = Some(at);
        self.updated_at = Some(at);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_customer() -> NewCustomer {
        serde_json::from_value(serde_json::json!({
            "name": "Rina",
            "email": "Rina@Example.com",
            "city": "Bandung"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_customer_starts_without_orders() {
        let customer = Customer::new(CustomerId::new(1), new_customer(), Utc::now());
        assert_eq!(customer.email.as_str(), "rina@example.com");
        assert_eq!(customer.total_orders, 0);
        assert_eq!(customer.total_spent, Decimal::ZERO);
        assert!(customer.last_order_at.is_none());
    }

    #[test]
    fn test_record_order_accumulates() {
        let now = Utc::now();
        let mut customer = Customer::new(CustomerId::new(1), new_customer(), now);
        customer.record_order(Decimal::new(4500, 2), now);
        customer.record_order(Decimal::new(3500, 2), now);

        assert_eq!(customer.total_orders, 2);
        assert_eq!(customer.total_spent, Decimal::from(80));
        assert_eq!(customer.last_order_at, Some(now));
    }

    #[test]
    fn test_refresh_contact_keeps_missing_fields() {
        let now = Utc::now();
        let mut customer = Customer::new(CustomerId::new(1), new_customer(), now);
        let mut update = new_customer();
        update.name = "Rina S.".to_string();
        update.city = None;
        update.phone = Some("0812".to_string());
        customer.refresh_contact(update, now);

        assert_eq!(customer.name, "Rina S.");
        assert_eq!(customer.city.as_deref(), Some("Bandung"));
        assert_eq!(customer.phone.as_deref(), Some("0812"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let result: Result<NewCustomer, _> = serde_json::from_value(serde_json::json!({
            "name": "Nobody",
            "email": "not-an-email"
        }));
        assert!(result.is_err());
    }
}
