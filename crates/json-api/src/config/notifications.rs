//! Notifications Config

use clap::Args;

/// Order notification settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// Webhook receiving `order.created` events; events are only logged when unset
    #[arg(long, env = "ORDER_WEBHOOK_URL")]
    pub order_webhook_url: Option<String>,
}
