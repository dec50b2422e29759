//! Prometheus metrics for the classification service.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const DOCUMENTS_TOTAL: &str = "lexsent_documents_total";
pub const TOKENS_FOUND: &str = "lexsent_tokens_found";
pub const TOKENS_NEGATED: &str = "lexsent_tokens_negated";
pub const CLASSIFY_ERRORS_TOTAL: &str = "lexsent_classify_errors_total";
pub const CLASSIFY_MS: &str = "lexsent_classify_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if a recorder is already
    /// installed in this process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe_once();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Register metric descriptions with the installed recorder (idempotent).
pub fn describe_once() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(DOCUMENTS_TOTAL, "Documents classified, by strategy.");
        describe_counter!(
            CLASSIFY_ERRORS_TOTAL,
            "Classification requests rejected before scanning."
        );
        describe_histogram!(TOKENS_FOUND, "Scanned tokens per document.");
        describe_histogram!(TOKENS_NEGATED, "Tokens inside negated spans per document.");
        describe_histogram!(CLASSIFY_MS, "Classification time in milliseconds.");
    });
}

/// Record one successful classification.
pub fn record_classification(strategy: &'static str, found: usize, negated: usize, elapsed_ms: f64) {
    counter!(DOCUMENTS_TOTAL, "strategy" => strategy).increment(1);
    histogram!(TOKENS_FOUND).record(found as f64);
    histogram!(TOKENS_NEGATED).record(negated as f64);
    histogram!(CLASSIFY_MS).record(elapsed_ms);
}

pub fn record_error() {
    counter!(CLASSIFY_ERRORS_TOTAL).increment(1);
}
