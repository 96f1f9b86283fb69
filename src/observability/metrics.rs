//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency by method
//! - `gateway_services` (gauge): currently installed services
//! - `gateway_sync_updates_total` (counter): services installed by the sync loop
//! - `gateway_registry_errors_total` (counter): failed registry polls

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(error = %e, "Failed to install metrics exporter");
        return;
    }

    describe_counter!("gateway_requests_total", "Requests handled, by method and status");
    describe_histogram!(
        "gateway_request_duration_seconds",
        "Request latency in seconds, by method"
    );
    describe_gauge!("gateway_services", "Services currently installed in the routing table");
    describe_counter!(
        "gateway_sync_updates_total",
        "Service updates applied from the registry"
    );
    describe_counter!("gateway_registry_errors_total", "Failed registry polls");

    tracing::info!(address = %addr, "Metrics exporter listening");
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn set_service_count(count: usize) {
    gauge!("gateway_services").set(count as f64);
}

pub fn record_sync_update() {
    counter!("gateway_sync_updates_total").increment(1);
}

pub fn record_registry_error() {
    counter!("gateway_registry_errors_total").increment(1);
}
