//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_rewritten_attributes_total` (counter): attributes pointed into the namespace
//! - `gateway_rewrite_failures_total` (counter): attributes left untouched after a resolution error
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Exposition is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::rewrite::RewriteReport;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished gateway request.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!(
        "gateway_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "status" => status,
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the result of an HTML rewrite pass.
pub fn record_rewrite(report: &RewriteReport) {
    counter!("gateway_rewritten_attributes_total").increment(report.rewritten as u64);
    counter!("gateway_rewrite_failures_total").increment(report.failed as u64);
}
