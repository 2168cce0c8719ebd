//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `ADMIN_USERNAME` - Admin login name
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC string (`preface-cli admin hash-password`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - Catalog JSON file (default: bundled catalog)
//! - `STOREFRONT_CORS_ORIGINS` - Comma-separated allowed origins
//! - `STOREFRONT_SHIPPING_FLAT_RATE` - Shipping charged per order (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use argon2::password_hash::PasswordHash;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog file to seed from; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Flat shipping charge added at checkout
    pub shipping_flat_rate: Decimal,
    /// Admin login
    pub admin: AdminCredentials,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Admin login credentials.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or_default::<IpAddr>(optional("STOREFRONT_HOST"), "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_or_default::<u16>(optional("STOREFRONT_PORT"), "STOREFRONT_PORT", "3000")?;

        let base_url = required("STOREFRONT_BASE_URL")?;
        validate_base_url(&base_url)?;

        let catalog_path = optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let cors_origins = optional("STOREFRONT_CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let shipping_flat_rate = parse_or_default::<Decimal>(
            optional("STOREFRONT_SHIPPING_FLAT_RATE"),
            "STOREFRONT_SHIPPING_FLAT_RATE",
            "0",
        )?;
        if shipping_flat_rate.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SHIPPING_FLAT_RATE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let admin = AdminCredentials {
            username: required("ADMIN_USERNAME")?,
            password_hash: SecretString::from(required("ADMIN_PASSWORD_HASH")?),
        };
        validate_password_hash(&admin.password_hash, "ADMIN_PASSWORD_HASH")?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            cors_origins,
            shipping_flat_rate,
            admin,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(optional("SENTRY_SAMPLE_RATE"), "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_or_default(
                optional("SENTRY_TRACES_SAMPLE_RATE"),
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.1",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a value, falling back to `default` when the variable is unset.
fn parse_or_default<T>(value: Option<String>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The base URL must be an absolute http(s) URL with a host.
fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), reason);

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("must have a host".to_string()));
    }
    Ok(())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

/// Reject anything that is not a parseable PHC string, so a plaintext
/// password in the environment fails at startup instead of at first login.
fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    PasswordHash::new(hash.expose_secret())
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), format!("not an Argon2 PHC string ({e})")))
}
