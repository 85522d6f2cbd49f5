//! Prometheus request metrics and the `/metrics` scrape endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

/// Path the scrape endpoint is mounted on. The request hoop does not record it.
pub(crate) const METRICS_PATH: &str = "/metrics";

const DURATION_BUCKETS: [f64; 12] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

#[derive(Debug)]
struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
}

static API_METRICS: OnceLock<Option<ApiMetrics>> = OnceLock::new();

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    tracked: bool,
}

impl InFlightGuard {
    pub(crate) fn track() -> Self {
        let tracked = metrics().is_some_and(|metrics| {
            metrics.requests_in_flight.inc();
            true
        });

        Self { tracked }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.tracked {
            return;
        }

        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.dec();
        }
    }
}

/// Record one finished request.
pub(crate) fn observe_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status = status.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Prometheus text exposition of every request metric.
#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut body) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Err(source) => {
            error!("invalid metrics content type: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    }

    res.render(String::from_utf8_lossy(&body).into_owned());
}

fn metrics() -> Option<&'static ApiMetrics> {
    API_METRICS.get_or_init(build_metrics).as_ref()
}

fn register<C>(registry: &Registry, name: &str, collector: Result<C, prometheus::Error>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let collector = match collector {
        Ok(collector) => collector,
        Err(source) => {
            error!(metric = name, "failed to create metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(collector.clone())) {
        error!(metric = name, "failed to register metric: {source}");
        return None;
    }

    Some(collector)
}

fn build_metrics() -> Option<ApiMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "milkrun_http_requests_total",
        IntCounterVec::new(
            Opts::new(
                "milkrun_http_requests_total",
                "HTTP requests by method, route and status code.",
            ),
            &["method", "route", "status"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "milkrun_http_request_duration_seconds",
        HistogramVec::new(
            HistogramOpts::new(
                "milkrun_http_request_duration_seconds",
                "HTTP request latency in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "milkrun_http_requests_in_flight",
        IntGauge::new(
            "milkrun_http_requests_in_flight",
            "HTTP requests currently being served.",
        ),
    )?;

    Some(ApiMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
    })
}
