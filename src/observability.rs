//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection with a Prometheus recorder
//! - Span helpers for the conversion pipeline
//! - OCR engine readiness checks

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::ocr::TextRecognizer;
use crate::observability_config::ObservabilityConfig;

/// Initialize logging and the metrics recorder.
///
/// Returns the handle that renders the `/metrics` endpoint.
pub fn init_observability_with_config(config: &ObservabilityConfig) -> Result<PrometheusHandle> {
    // Validate configuration
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    // Initialize tracing first
    init_tracing_with_config(config)?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    tracing::info!(
        environment = %config.environment,
        pretty_logs = config.use_pretty_logs(),
        "Observability stack initialized successfully"
    );
    Ok(metrics_handle)
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    // Create the filter based on configuration
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("image_to_word={}", config.log_level).parse()?)
        .add_directive("tower_http=info".parse()?)
        .add_directive("hyper=warn".parse()?);

    // Pretty for development, JSON for everything else
    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Initialize metrics collection with Prometheus exporter
pub fn init_metrics() -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    describe_metrics();

    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!(
        "images_processed_total",
        "Uploaded images by final outcome (text, no_text, failed)"
    );
    metrics::describe_counter!("batches_total", "Conversion requests by final state");
    metrics::describe_counter!("ocr_operations_total", "OCR engine invocations by result");
    metrics::describe_histogram!(
        "ocr_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent inside the OCR engine per image"
    );
    metrics::describe_histogram!(
        "preprocess_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent preprocessing one image"
    );
    metrics::describe_histogram!(
        "document_size_bytes",
        metrics::Unit::Bytes,
        "Size of each exported document"
    );
}

/// Create a span for OCR operations
pub fn ocr_span(operation: &str) -> tracing::Span {
    tracing::info_span!("ocr_operation", operation = operation, component = "ocr")
}

/// Create a span covering one conversion request
pub fn batch_span(file_count: usize) -> tracing::Span {
    tracing::info_span!("batch_operation", files = file_count, component = "batch")
}

/// Record OCR operation metrics
pub fn record_ocr_metrics(success: bool, duration: std::time::Duration) {
    metrics::counter!("ocr_operations_total", "result" => if success { "success" } else { "failure" }).increment(1);
    metrics::histogram!("ocr_duration_seconds").record(duration.as_secs_f64());
}

/// Record how long preprocessing took for one image
pub fn record_preprocess_metrics(duration: std::time::Duration) {
    metrics::histogram!("preprocess_duration_seconds").record(duration.as_secs_f64());
}

/// Record the final outcome of one uploaded image
pub fn record_image_outcome(outcome: &'static str) {
    metrics::counter!("images_processed_total", "outcome" => outcome).increment(1);
}

/// Record the final state of one conversion request
pub fn record_batch(state: &'static str) {
    metrics::counter!("batches_total", "state" => state).increment(1);
}

/// Record the size of an exported document
pub fn record_document_size(size_bytes: usize) {
    metrics::histogram!("document_size_bytes").record(size_bytes as f64);
}

/// Check OCR engine availability, off the async runtime
pub async fn check_ocr_health(recognizer: std::sync::Arc<dyn TextRecognizer>) -> Result<()> {
    let available = tokio::task::spawn_blocking(move || recognizer.is_available()).await?;
    if available {
        tracing::debug!("OCR health check passed");
        Ok(())
    } else {
        Err(anyhow::anyhow!("OCR health check failed: engine not available"))
    }
}
