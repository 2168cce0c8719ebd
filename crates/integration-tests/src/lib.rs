//! End-to-end tests for the PREFACE storefront.
//!
//! Each test spawns its own storefront on an ephemeral port, seeded from the
//! bundled catalog, and talks to it over real HTTP with a cookie-keeping
//! client. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p preface-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Shopper cart API
//! - `checkout_flow` - Checkout, promotions and order tracking
//! - `admin_flow` - Admin login and back-office API

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;

use reqwest::{Client, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use preface_storefront::config::StorefrontConfig;
use preface_storefront::db::Database;
use preface_storefront::services::auth::hash_password;
use preface_storefront::state::AppState;

/// Admin username every test storefront accepts.
pub const ADMIN_USERNAME: &str = "admin";
/// Admin password every test storefront accepts.
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// A running storefront plus a client holding one shopper's cookies.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Spawn a storefront with the default settings.
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Spawn a storefront with extra configuration entries.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be configured or bound.
    #[allow(clippy::unwrap_used)]
    pub async fn with_env(extra: &[(&str, &str)]) -> Self {
        let password_hash = hash_password(ADMIN_PASSWORD).unwrap();
        let mut env: HashMap<&str, String> = HashMap::from([
            ("STOREFRONT_BASE_URL", "http://127.0.0.1".to_string()),
            ("ADMIN_USERNAME", ADMIN_USERNAME.to_string()),
            ("ADMIN_PASSWORD_HASH", password_hash),
        ]);
        env.extend(extra.iter().map(|(k, v)| (*k, (*v).to_string())));

        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let db = Database::seeded(None).unwrap();
        let app = preface_storefront::build_app(AppState::new(config, db));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        Self {
            client: Self::client(),
            base_url: format!("http://{addr}"),
        }
    }

    /// A fresh client with an empty cookie jar, e.g. a second shopper.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn client() -> Client {
        Client::builder().cookie_store(true).build().unwrap()
    }

    /// Another visitor on the same storefront, with its own cookie jar.
    #[must_use]
    pub fn new_session(&self) -> Self {
        Self {
            client: Self::client(),
            base_url: self.base_url.clone(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` with this context's client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// POST `body` as JSON to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::unwrap_used)]
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    /// PUT `body` as JSON to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::unwrap_used)]
    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client.put(self.url(path)).json(body).send().await.unwrap()
    }

    /// DELETE `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::unwrap_used)]
    pub async fn delete(&self, path: &str) -> Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// Add a product to this client's cart.
    pub async fn add_to_cart(&self, product_id: &str, size: &str, quantity: u32) -> Response {
        self.post(
            "/cart/add",
            &json!({"product_id": product_id, "size": size, "quantity": quantity}),
        )
        .await
    }

    /// Log this client in as the admin.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login_admin(&self) {
        let resp = self
            .post(
                "/admin/auth/login",
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(resp.status(), 200, "admin login failed");
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
#[allow(clippy::unwrap_used)]
pub async fn body_json(resp: Response) -> Value {
    resp.json().await.unwrap()
}

/// Checkout body for a shopper with the given email.
#[must_use]
pub fn checkout_body(email: &str) -> Value {
    json!({
        "customer_name": "Alex Morgan",
        "customer_email": email,
        "customer_phone": "081200000000",
        "shipping": {
            "address": "Jl. Braga 1",
            "city": "Bandung",
            "province": "Jawa Barat",
            "postal_code": "40111"
        },
        "payment_method": "bank_transfer"
    })
}
