//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status
//! - `proxy_request_duration_seconds` (histogram): latency by method
//! - `proxy_upstream_errors_total` (counter): failed upstream calls by kind
//! - `telemetry_events_total` (counter): sink submissions by outcome
//! - `web_vitals_value` (histogram): reported vital values by name
//!
//! Without an installed recorder every call is a no-op. Label values that
//! come from callers are folded into a fixed set so series stay bounded.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
/// Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Vital names the web-vitals library reports.
pub const WEB_VITALS: [&str; 6] = ["CLS", "FCP", "FID", "INP", "LCP", "TTFB"];

const METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "CONNECT", "TRACE",
];

fn bounded(value: &str, known: &[&'static str]) -> &'static str {
    known
        .iter()
        .find(|k| **k == value)
        .copied()
        .unwrap_or("other")
}

pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let method = bounded(method, &METHODS);
    counter!(
        "proxy_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "method" => method)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_upstream_error(kind: &'static str) {
    counter!("proxy_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_telemetry(outcome: &'static str) {
    counter!("telemetry_events_total", "outcome" => outcome).increment(1);
}

pub fn record_vital(name: &str, value: f64) {
    histogram!("web_vitals_value", "name" => bounded(name, &WEB_VITALS)).record(value);
}
