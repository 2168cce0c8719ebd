//! In-memory data store.
//!
//! All storefront data lives for the lifetime of the process:
//!
//! ## Tables
//!
//! - `catalog` - Products, seeded from the catalog JSON
//! - `orders` - Placed orders, keyed by id
//! - `customers` - Customers created by the admin API or at checkout
//! - `promotions` - Promotion codes
//!
//! Every table sits behind one [`tokio::sync::RwLock`] so that checkout can
//! read the catalog, decrement stock, record promotion use and store the
//! order as a single step.

pub mod customers;
pub mod orders;
pub mod products;
pub mod promotions;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use preface_core::{Catalog, CatalogError, Customer, CustomerId, Order, OrderId, Promotion, PromotionId};

pub use customers::CustomerRepository;
pub use orders::{OrderQuery, OrderRepository};
pub use products::ProductRepository;
pub use promotions::{PromotionQuery, PromotionRepository};

/// The catalog shipped with the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The change would leave the entity invalid.
    #[error("invalid data: {0}")]
    Invalid(String),
}

/// Errors loading the seed catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Every table in the store.
#[derive(Debug, Default)]
pub struct Tables {
    pub catalog: Catalog,
    pub orders: BTreeMap<OrderId, Order>,
    pub customers: BTreeMap<CustomerId, Customer>,
    pub promotions: BTreeMap<PromotionId, Promotion>,
}

impl Tables {
    pub(crate) fn next_order_id(&self) -> OrderId {
        self.orders
            .keys()
            .next_back()
            .map_or(OrderId::new(1), OrderId::next)
    }

    pub(crate) fn next_customer_id(&self) -> CustomerId {
        self.customers
            .keys()
            .next_back()
            .map_or(CustomerId::new(1), CustomerId::next)
    }

    pub(crate) fn next_promotion_id(&self) -> PromotionId {
        self.promotions
            .keys()
            .next_back()
            .map_or(PromotionId::new(1), PromotionId::next)
    }
}

/// Shared handle to the store.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    /// Create a store holding `catalog` and nothing else.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            tables: RwLock::new(Tables {
                catalog,
                ..Tables::default()
            }),
        }
    }

    /// Create a store seeded from a catalog file, or the bundled catalog when
    /// `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the file cannot be read or is not a valid
    /// catalog.
    pub fn seeded(path: Option<&Path>) -> Result<Self, SeedError> {
        let catalog = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::from_json(BUNDLED_CATALOG)?,
        };
        Ok(Self::new(catalog))
    }

    /// Shared access to every table.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Exclusive access to every table.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    #[must_use]
    pub const fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self)
    }

    #[must_use]
    pub const fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(self)
    }

    #[must_use]
    pub const fn customers(&self) -> CustomerRepository<'_> {
        CustomerRepository::new(self)
    }

    #[must_use]
    pub const fn promotions(&self) -> PromotionRepository<'_> {
        PromotionRepository::new(self)
    }
}
