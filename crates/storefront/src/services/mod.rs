//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Admin login and Argon2 password hashing
//! - `checkout` - Turning a cart snapshot into an order
//! - `analytics` - Dashboard figures for the admin API

pub mod analytics;
pub mod auth;
pub mod checkout;
