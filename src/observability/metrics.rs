//! Metrics collection and exposition.
//!
//! # Metrics
//! - `toolkit_requests_total` (counter): requests by endpoint, status
//! - `toolkit_request_duration_seconds` (histogram): latency by endpoint
//! - `toolkit_provider_calls_total` (counter): outbound calls by provider, outcome
//! - `toolkit_audit_writes_total` (counter): audit rows by status
//!
//! Recording is a no-op until a recorder is installed, so handlers and
//! tests can call these unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::audit::RequestStatus;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(endpoint: &str, status: u16, start: Instant) {
    metrics::counter!(
        "toolkit_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("toolkit_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record an outbound provider call and its outcome.
pub fn record_provider_call(provider: &'static str, outcome: &'static str) {
    metrics::counter!(
        "toolkit_provider_calls_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an audit row write.
pub fn record_audit_write(status: RequestStatus) {
    metrics::counter!("toolkit_audit_writes_total", "status" => status.as_str()).increment(1);
}
