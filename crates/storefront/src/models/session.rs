//! Session-related types.
//!
//! The session holds two things: the shopper's cart snapshot and, for the
//! admin API, the logged-in admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Session keys.
pub mod keys {
    /// Key for the serialized cart store.
    pub const CART: &str = "cart";

    /// Key for the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
