//! Customer repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use preface_core::{Customer, CustomerId, NewCustomer, Page};

use super::{Database, RepositoryError, Tables};

/// Repository for customer operations.
pub struct CustomerRepository<'a> {
    db: &'a Database,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List customers, newest first.
    pub async fn list(&self, skip: usize, limit: Option<usize>) -> Page<Customer> {
        let all = self.db.read().await.customers.values().rev().cloned().collect();
        Page::from_vec(all, skip, limit)
    }

    /// Get a customer by id.
    pub async fn get(&self, id: CustomerId) -> Option<Customer> {
        self.db.read().await.customers.get(&id).cloned()
    }

    /// Number of customers.
    pub async fn count(&self) -> usize {
        self.db.read().await.customers.len()
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.customers.values().any(|c| c.email == new.email) {
            return Err(RepositoryError::Conflict("Email already registered".to_string()));
        }

        let id = tables.next_customer_id();
        let customer = Customer::new(id, new, Utc::now());
        tables.customers.insert(id, customer.clone());
        Ok(customer)
    }
}

impl Tables {
    /// Record an order against the customer with this email, creating the
    /// customer on first purchase.
    pub(crate) fn record_customer_order(&mut self, details: NewCustomer, total: Decimal, at: DateTime<Utc>) -> CustomerId {
        if let Some(customer) = self.customers.values_mut().find(|c| c.email == details.email) {
            customer.refresh_contact(details, at);
            customer.record_order(total, at);
            return customer.id;
        }

        let id = self.next_customer_id();
        let mut customer = Customer::new(id, details, at);
        customer.record_order(total, at);
        self.customers.insert(id, customer);
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use preface_core::Email;

    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "Dewi".to_string(),
            email: Email::parse(email).unwrap(),
            phone: None,
            address: None,
            city: None,
            province: None,
            postal_code: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::default();
        db.customers().create(new_customer("dewi@example.com")).await.unwrap();

        let err = db
            .customers()
            .create(new_customer("DEWI@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(db.customers().count().await, 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::default();
        db.customers().create(new_customer("a@example.com")).await.unwrap();
        db.customers().create(new_customer("b@example.com")).await.unwrap();

        let page = db.customers().list(0, None).await;
        assert_eq!(page.total, 2);
        assert_eq!(page.items.first().unwrap().email.as_str(), "b@example.com");
    }

    #[tokio::test]
    async fn test_record_customer_order_upserts_by_email() {
        let db = Database::default();
        let now = Utc::now();
        let mut tables = db.write().await;

        let first = tables.record_customer_order(new_customer("c@example.com"), Decimal::from(45), now);
        let second = tables.record_customer_order(new_customer("C@Example.com"), Decimal::from(90), now);

        assert_eq!(first, second);
        let customer = tables.customers.get(&first).unwrap();
        assert_eq!(customer.total_orders, 2);
        assert_eq!(customer.total_spent, Decimal::from(135));
    }
}
