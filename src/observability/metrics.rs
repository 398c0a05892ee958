//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prediction_requests_total` (counter): requests by method, route, status
//! - `prediction_request_duration_seconds` (histogram): latency by method, route
//! - `prediction_scoring_failures_total` (counter): engine rejections by category
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Route labels use the matched route pattern, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "prediction_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "prediction_request_duration_seconds";
pub const SCORING_FAILURES_TOTAL: &str = "prediction_scoring_failures_total";

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request the engine refused to score.
pub fn record_scoring_failure(category: &str) {
    counter!(SCORING_FAILURES_TOTAL, "category" => category.to_string()).increment(1);
}
