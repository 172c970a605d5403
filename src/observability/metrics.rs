//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wasm_submissions_total` (counter): service calls by operation and outcome
//! - `wasm_pending_pool_size` (gauge): transactions waiting for a block
//! - `wasm_block_notifications_total` (counter): block-ready signals by result
//! - `wasm_blocks_built_total` (counter) / `wasm_block_txs` (histogram)

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter, serving scrapes on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one service call. `outcome` is `"ok"` or the error kind.
pub fn record_submission(op: &'static str, outcome: &'static str) {
    counter!("wasm_submissions_total", "op" => op, "outcome" => outcome).increment(1);
}

pub fn record_pool_size(len: usize) {
    gauge!("wasm_pending_pool_size").set(len as f64);
}

pub fn record_notification(result: &'static str) {
    counter!("wasm_block_notifications_total", "result" => result).increment(1);
}

pub fn record_block(txs: usize) {
    counter!("wasm_blocks_built_total").increment(1);
    histogram!("wasm_block_txs").record(txs as f64);
}
