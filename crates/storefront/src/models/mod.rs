//! Types stored in the session.

pub mod session;

pub use session::{CurrentAdmin, keys as session_keys};
