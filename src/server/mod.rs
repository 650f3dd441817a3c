//! Web shell for the converter.
//!
//! A single upload page: choose images, get back per-image previews with
//! their recognized text and a link to the assembled `output.docx`.
//! Every request is self-contained; nothing is stored between requests.

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::ocr::{OcrConfig, TextRecognizer};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub recognizer: Arc<dyn TextRecognizer>,
    pub ocr_config: Arc<OcrConfig>,
    /// Renders `/metrics`; absent when no recorder was installed.
    pub metrics: Option<PrometheusHandle>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        recognizer: Arc<dyn TextRecognizer>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            recognizer,
            ocr_config: Arc::new(config.ocr.clone()),
            metrics,
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// Start the web server and run until shutdown.
pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = config.server.socket_addr()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
