//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        coupons::{CouponsService, StoreCouponsService},
        customers::{CustomersService, StoreCustomersService},
        orders::{OrdersService, StoreOrdersService, data::OrderSettings},
        payments::{GatewayAccess, PaymentsService, StorePaymentsService},
    },
    gateway::{GatewayConfig, HttpGateway},
    notifications::{LogNotifier, Notifier, NotifyError, WebhookNotifier},
    store::{PgStore, Store},
};

/// Currency charged when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to build order webhook client")]
    Notifier(#[source] NotifyError),
}

/// Runtime settings for the application services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub order_settings: OrderSettings,
    pub currency: String,

    /// Online payments are unavailable without a gateway.
    pub gateway: Option<GatewayConfig>,

    /// Where to post order notifications. They are only logged when unset.
    pub webhook_url: Option<String>,

    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            order_settings: OrderSettings::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            gateway: None,
            webhook_url: None,
            run_migrations: false,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub customers: Arc<dyn CustomersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection, applying migrations or
    /// building the notifier fails.
    pub async fn from_database_url(url: &str, config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if config.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;

            info!("database migrations applied");
        }

        let store: Arc<dyn Store> = Arc::new(PgStore::new(Db::new(pool.clone())));

        Self::from_store(store, Arc::new(PgAuthService::new(pool)), config)
    }

    /// Wire the services over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error when the webhook notifier cannot be built.
    pub fn from_store(
        store: Arc<dyn Store>,
        auth: Arc<dyn AuthService>,
        config: AppConfig,
    ) -> Result<Self, AppInitError> {
        let notifier: Arc<dyn Notifier> = match &config.webhook_url {
            Some(url) => {
                Arc::new(WebhookNotifier::new(url.clone()).map_err(AppInitError::Notifier)?)
            }
            None => Arc::new(LogNotifier),
        };

        let gateway = config.gateway.map(|gateway| GatewayAccess {
            secret: gateway.key_secret.clone(),
            client: Arc::new(HttpGateway::new(gateway)),
        });

        if gateway.is_none() {
            info!("payment gateway not configured; online payments are unavailable");
        }

        Ok(Self {
            orders: Arc::new(StoreOrdersService::new(
                store.clone(),
                config.order_settings,
                notifier,
            )),
            payments: Arc::new(StorePaymentsService::new(
                store.clone(),
                gateway,
                config.currency,
            )),
            coupons: Arc::new(StoreCouponsService::new(store.clone())),
            customers: Arc::new(StoreCustomersService::new(store)),
            auth,
        })
    }
}
