//! PREFACE Core - Shared domain library.
//!
//! This crate provides the domain model used by every PREFACE component:
//! - `storefront` - Public shop API and admin API (port 3000)
//! - `cli` - Operator tools (password hashing, catalog checks, order tracking)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no locking. Owners (an HTTP session, the in-memory store) hold these values
//! and decide how they are shared.
//!
//! # Modules
//!
//! - [`cart`] - The shopping cart store and its line items
//! - [`catalog`] - Products, reviews, and catalog queries
//! - [`order`] - Orders, order items, totals, and tracking steps
//! - [`promotion`] - Promotion codes and discount rules
//! - [`customer`] - Customer records built up from checkouts
//! - [`types`] - Newtype ids, money helpers, emails, statuses, pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;
pub mod promotion;
pub mod types;

pub use cart::{CartLineItem, CartStore, LineItemCandidate};
pub use catalog::{Batch, Catalog, CatalogError, Category, NewProduct, Product, ProductQuery, ProductUpdate};
pub use customer::{Customer, NewCustomer};
pub use order::{
    CustomerDetails, Order, OrderError, OrderItem, OrderTotals, OrderUpdate, ShippingAddress, TrackingStep,
};
pub use promotion::{Discount, Promotion, PromotionError, PromotionInput, PromotionKind};
pub use types::*;
