//! Metrics collection and Prometheus export.
//!
//! Installs the process-wide recorder and renders it for the prometheus endpoint.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Safe to call more than once; later calls return the existing handle. If some
/// other recorder already owns the global slot, a detached recorder is used so
/// rendering still works but records nothing.
pub fn init_metrics() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Failed to install Prometheus recorder: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one repository call against `collection`.
pub fn record_repository_operation(collection: &'static str, operation: &'static str, ok: bool) {
    let outcome = if ok { "success" } else { "error" };
    counter!(
        "board_repository_operations_total",
        "collection" => collection,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
