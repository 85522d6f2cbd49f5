//! Payment gateway client.
//!
//! The gateway works in minor currency units. Conversion from the order's major-unit total
//! happens at the call site, never in storage.

use async_trait::async_trait;
use milkrun::signature::GatewaySecret;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection details for the gateway's orders API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API base URL, e.g. `"https://api.gateway.example"`.
    pub base_url: String,

    /// Public key id, sent as the basic auth user.
    pub key_id: String,

    /// Key secret. Authenticates API calls and signs payment receipts.
    pub key_secret: GatewaySecret,
}

/// A payment intent created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayIntent {
    pub id: String,

    #[serde(rename = "amount")]
    pub amount_minor: u64,
    pub currency: String,
}

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount_minor` in `currency`.
    async fn create_intent(
        &self,
        amount_minor: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayIntent, GatewayError>;
}

#[derive(Debug, Serialize)]
struct CreateIntentRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

/// HTTP client for the gateway's orders API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: GatewayConfig,
    http: Client,
}

impl HttpGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn create_intent(
        &self,
        amount_minor: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayIntent, GatewayError> {
        let url = format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'));

        let key_secret = String::from_utf8_lossy(self.config.key_secret.as_bytes());

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(key_secret))
            .json(&CreateIntentRequest {
                amount: amount_minor,
                currency,
                receipt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "order request failed with status {status}: {text}"
            )));
        }

        let intent: GatewayIntent = response.json().await?;

        if intent.amount_minor != amount_minor {
            return Err(GatewayError::UnexpectedResponse(format!(
                "gateway created an order for {} instead of {amount_minor}",
                intent.amount_minor
            )));
        }

        Ok(intent)
    }
}
