//! Metrics recording.
//!
//! # Metrics
//! - `sync_refresh_total` (counter): canonical fetches by outcome
//! - `sync_notifications_total` (counter): change notifications by origin
//! - `sync_socket_reconnects_total` (counter): scheduled socket reconnects
//! - `sync_socket_connected` (gauge): 1=connected, 0=not connected
//! - `api_requests_total` (counter): API calls by method and outcome
//! - `api_retries_total` (counter): retried API attempts

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("sync_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_notification(origin: &'static str) {
    metrics::counter!("sync_notifications_total", "origin" => origin).increment(1);
}

pub fn record_publish_failure() {
    metrics::counter!("sync_publish_failures_total").increment(1);
}

pub fn record_reconnect_scheduled() {
    metrics::counter!("sync_socket_reconnects_total").increment(1);
}

pub fn record_socket_connected(connected: bool) {
    metrics::gauge!("sync_socket_connected").set(if connected { 1.0 } else { 0.0 });
}

pub fn record_api_request(method: &str, outcome: &'static str) {
    metrics::counter!("api_requests_total", "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_api_retry() {
    metrics::counter!("api_retries_total").increment(1);
}
