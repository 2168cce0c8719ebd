//! Core types for PREFACE.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pagination;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::Page;
pub use price::{format_price, round_money};
pub use status::*;
