//! Order notifications.
//!
//! Delivery is best effort. Dispatch happens on a spawned task after the order is
//! persisted; failures are logged and never reach the caller.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::orders::records::OrderRecord;

/// How long a webhook delivery may take before it is abandoned.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The receiver answered with a non-2xx status.
    #[error("webhook rejected notification with status {0}")]
    Rejected(u16),
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a newly persisted order.
    async fn order_created(&self, order: &OrderRecord) -> Result<(), NotifyError>;
}

/// Spawn delivery of an "order created" notification.
pub fn dispatch_order_created(notifier: &Arc<dyn Notifier>, order: &OrderRecord) {
    let notifier = Arc::clone(notifier);
    let order = order.clone();

    tokio::spawn(async move {
        if let Err(error) = notifier.order_created(&order).await {
            warn!(
                order_uuid = %order.uuid,
                order_number = %order.order_number,
                error = %error,
                "order notification failed"
            );
        }
    });
}

/// Writes notifications to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_created(&self, order: &OrderRecord) -> Result<(), NotifyError> {
        info!(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            total = %order.pricing.total,
            payment_method = %order.payment.method,
            "order created"
        );

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OrderCreatedPayload<'a> {
    event: &'static str,
    order: &'a OrderRecord,
}

/// Posts notifications as JSON to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    http: Client,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        Ok(Self {
            url: url.into(),
            http: Client::builder().timeout(WEBHOOK_TIMEOUT).build()?,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn order_created(&self, order: &OrderRecord) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&OrderCreatedPayload {
                event: "order.created",
                order,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
