//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shopfront_requests_total` (counter): requests by method, status, handler
//! - `shopfront_request_duration_seconds` (histogram): latency by handler
//! - `shopfront_route_misses_total` (counter): requests that matched no route
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op (tests, CLI)
//! - Handler label is the `Target.operation` ref, bounded by the route table

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, handler: &str, start: Instant) {
    metrics::counter!(
        "shopfront_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "handler" => handler.to_string()
    )
    .increment(1);
    metrics::histogram!("shopfront_request_duration_seconds", "handler" => handler.to_string())
        .record(start.elapsed().as_secs_f64());

    if handler == "none" && status == 404 {
        metrics::counter!("shopfront_route_misses_total").increment(1);
    }
}
