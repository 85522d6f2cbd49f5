//! Logging setup, request tracing middleware and Prometheus metrics.

use thiserror::Error;

mod logging;
mod metrics;
mod request;
mod settings;

pub(crate) use logging::init_subscriber;
pub(crate) use metrics::metrics_handler;
pub(crate) use request::request_logging;
pub(crate) use settings::apply_runtime_config;

/// Errors raised while initialising logging.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
