//! Server configuration module

use clap::Parser;
use milkrun_app::{
    auth::{AdminTokenDigest, AdminTokenError},
    context::AppConfig,
    domain::orders::data::OrderSettings,
};
use milkrun::pricing::DeliveryPolicy;

use crate::config::{
    admin::AdminConfig, db::DatabaseConfig, gateway::GatewaySettings,
    logging::LoggingConfig, notifications::NotificationsConfig, pricing::PricingConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod admin;
pub(crate) mod db;
pub(crate) mod gateway;
pub(crate) mod logging;
pub(crate) mod notifications;
pub(crate) mod pricing;
pub(crate) mod server;

pub(crate) use logging::LogFormat;

/// Milkrun JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "milkrun-json", about = "Milkrun JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Order pricing settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub gateway: GatewaySettings,

    /// Admin access settings.
    #[command(flatten)]
    pub admin: AdminConfig,

    /// Order notification settings.
    #[command(flatten)]
    pub notifications: NotificationsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            order_settings: OrderSettings {
                delivery: DeliveryPolicy {
                    free_delivery_threshold: self.pricing.free_delivery_threshold,
                    delivery_fee: self.pricing.delivery_fee,
                },
                price_tolerance: self.pricing.price_tolerance,
            },
            currency: self.pricing.currency.clone(),
            gateway: self.gateway.gateway_config(),
            webhook_url: self.notifications.order_webhook_url.clone(),
            run_migrations: self.database.run_migrations,
        }
    }

    /// Parsed admin token digest, if admin access is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured digest is not valid hex.
    pub fn admin_digest(&self) -> Result<Option<AdminTokenDigest>, AdminTokenError> {
        self.admin
            .admin_token_sha256
            .as_deref()
            .map(AdminTokenDigest::from_hex)
            .transpose()
    }
}
