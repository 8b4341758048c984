//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_operations_total` (counter): facade calls by operation, outcome
//! - `wallet_state_transitions_total` (counter): lock state changes by target state
//! - `wallet_rpc_errors_total` (counter): failed RPC calls by blockchain
//! - `wallet_rpc_health` (gauge): 1=healthy, 0=unhealthy, per blockchain

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a wallet operation. `outcome` is "ok" or an error code.
pub fn record_operation(operation: &'static str, outcome: &str) {
    counter!(
        "wallet_operations_total",
        "operation" => operation,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a lock state transition.
pub fn record_state_transition(to: &'static str) {
    counter!("wallet_state_transitions_total", "to" => to).increment(1);
}

/// Record a failed RPC call against a blockchain.
pub fn record_rpc_error(blockchain: &str) {
    counter!("wallet_rpc_errors_total", "blockchain" => blockchain.to_string()).increment(1);
}

/// Record RPC reachability for a blockchain.
pub fn record_rpc_health(blockchain: &str, healthy: bool) {
    gauge!("wallet_rpc_health", "blockchain" => blockchain.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
