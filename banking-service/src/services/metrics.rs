//! Prometheus metrics for banking-service.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once, from `main`.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics recorder already initialized");
    }

    Ok(())
}

/// All metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_payment_created(status: &str) {
    counter!("banking_payments_created_total", "status" => status.to_string()).increment(1);
}

pub fn record_payment_cancelled() {
    counter!("banking_payments_cancelled_total").increment(1);
}

pub fn record_beneficiary_created() {
    counter!("banking_beneficiaries_created_total").increment(1);
}

pub fn record_beneficiary_deleted() {
    counter!("banking_beneficiaries_deleted_total").increment(1);
}

pub fn record_statement_download(format: &str) {
    counter!("banking_statement_downloads_total", "format" => format.to_string()).increment(1);
}
