//! Order lookup commands.
//!
//! # Usage
//!
//! ```bash
//! preface-cli order track ORD-20251020-8K2M4Q
//! preface-cli order track ORD-20251020-8K2M4Q --base-url https://preface.example.com
//! ```

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use preface_core::{Order, format_price};

/// Errors that can occur while tracking an order.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid storefront URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Storefront returned {status}: {detail}")]
    Api { status: u16, detail: String },
}

/// `GET /orders/{order_number}` response body.
#[derive(Debug, Deserialize)]
struct TrackedOrder {
    #[serde(flatten)]
    order: Order,
    tracking_steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    label: String,
    completed: bool,
    current: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Fetch an order from a running storefront and log its timeline.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails, or the order
/// does not exist.
pub async fn track(base_url: &str, order_number: &str) -> Result<(), OrderError> {
    let url = tracking_url(base_url, order_number)?;
    tracing::debug!(%url, "Fetching order");

    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(OrderError::NotFound(order_number.to_string()));
    }
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .map_or_else(|_| "no details".to_string(), |body| body.detail);
        return Err(OrderError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    let tracked: TrackedOrder = response.json().await?;
    let order = &tracked.order;

    tracing::info!(
        order_number = %order.order_number,
        status = ?order.status,
        payment_status = ?order.payment_status,
        items = order.items.len(),
        total = %format_price(order.totals.total),
        "Order found"
    );
    if let Some(tracking_number) = &order.tracking_number {
        tracing::info!("Tracking number: {tracking_number}");
    }
    for step in &tracked.tracking_steps {
        let mark = match (step.current, step.completed) {
            (true, _) => ">",
            (false, true) => "x",
            (false, false) => " ",
        };
        tracing::info!("[{mark}] {}", step.label);
    }

    Ok(())
}

/// Join the order path onto the storefront base URL.
fn tracking_url(base_url: &str, order_number: &str) -> Result<Url, OrderError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("orders")
        .push(order_number.trim());
    Ok(url)
}
