//! Order repository.
//!
//! Orders are inserted by checkout (see `services::checkout`); this
//! repository covers reads and admin updates.

use chrono::Utc;
use serde::Deserialize;

use preface_core::{Order, OrderId, OrderStatus, OrderUpdate, Page, PaymentStatus};

use super::{Database, RepositoryError};

/// Admin order listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    db: &'a Database,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List orders, newest first.
    pub async fn list(&self, query: &OrderQuery) -> Page<Order> {
        let tables = self.db.read().await;
        let matching: Vec<Order> = tables
            .orders
            .values()
            .rev()
            .filter(|o| query.status.is_none_or(|s| s == o.status))
            .filter(|o| query.payment_status.is_none_or(|s| s == o.payment_status))
            .cloned()
            .collect();
        Page::from_vec(matching, query.skip, query.limit)
    }

    /// The `limit` most recent orders.
    pub async fn recent(&self, limit: usize) -> Vec<Order> {
        self.db
            .read()
            .await
            .orders
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get an order by id.
    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.db.read().await.orders.get(&id).cloned()
    }

    /// Get an order by its public order number.
    pub async fn get_by_number(&self, order_number: &str) -> Option<Order> {
        self.db
            .read()
            .await
            .orders
            .values()
            .find(|o| o.order_number.eq_ignore_ascii_case(order_number.trim()))
            .cloned()
    }

    /// Apply an admin update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Invalid` if the status change is not allowed.
    pub async fn update(&self, id: OrderId, update: OrderUpdate) -> Result<Order, RepositoryError> {
        let mut tables = self.db.write().await;
        let order = tables.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        order
            .apply_update(update, Utc::now())
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        Ok(order.clone())
    }

    /// Cancel an order. Orders are never removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Invalid` if the order was already delivered.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let mut tables = self.db.write().await;
        let order = tables.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        order
            .cancel(Utc::now())
            .map_err(|e| RepositoryError::Invalid(e.to_string()))?;
        Ok(order.clone())
    }
}
