//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. CORS (configured origins only)
//! 6. Session layer (tower-sessions with in-memory store)
//! 7. Rate limiting (governor), per route group
//!
//! Extractors: [`SessionCart`] for the shopper's cart and [`RequireAdmin`]
//! for admin routes.

pub mod auth;
pub mod cart;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use cart::SessionCart;
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
