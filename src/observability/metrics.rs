//! Metrics collection and exposition.
//!
//! # Metrics
//! - `token_client_mints_total` (counter): mint outcomes by outcome, stage, error
//! - `token_client_mint_duration_seconds` (histogram): end-to-end mint latency
//! - `token_client_rpc_retries_total` (counter): retried RPC calls by method

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a successful mint.
pub fn record_mint_success(start: Instant) {
    metrics::counter!(
        "token_client_mints_total",
        "outcome" => "success",
        "stage" => "complete",
        "error" => "none"
    )
    .increment(1);
    metrics::histogram!("token_client_mint_duration_seconds", "outcome" => "success")
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed mint with the stage it stopped at.
pub fn record_mint_failure(stage: &'static str, error: &'static str, start: Instant) {
    metrics::counter!(
        "token_client_mints_total",
        "outcome" => "failure",
        "stage" => stage,
        "error" => error
    )
    .increment(1);
    metrics::histogram!("token_client_mint_duration_seconds", "outcome" => "failure")
        .record(start.elapsed().as_secs_f64());
}

/// Record one retried RPC call.
pub fn record_rpc_retry(method: &'static str) {
    metrics::counter!("token_client_rpc_retries_total", "method" => method).increment(1);
}
