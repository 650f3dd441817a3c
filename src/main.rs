use anyhow::Result;
use image_to_word::config::AppConfig;
use image_to_word::errors::error_logging;
use image_to_word::observability;
use image_to_word::ocr::{TesseractCli, TextRecognizer};
use image_to_word::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};

/// Load and validate configuration at startup
fn load_configuration() -> Result<AppConfig> {
    let config = AppConfig::from_env().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "load");
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    config.validate().map_err(|e| {
        error_logging::log_config_error(&e, "environment", "validate");
        anyhow::anyhow!(
            "Configuration validation failed: {}. Please check your environment variables.",
            e
        )
    })?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_configuration()?;

    // Initialize logging and metrics before anything else logs
    let metrics_handle = observability::init_observability_with_config(&config.observability)?;
    info!("{}", config.summary());

    let recognizer: Arc<dyn TextRecognizer> = Arc::new(TesseractCli::new(config.ocr.clone()));

    // Every recognition call fails without the engine, but the page can still be served
    let probe = Arc::clone(&recognizer);
    if !tokio::task::spawn_blocking(move || probe.is_available()).await? {
        warn!(
            tesseract_cmd = %config.ocr.tesseract_cmd.display(),
            "OCR engine not found; every conversion will report it as unavailable"
        );
    } else {
        info!("OCR engine available");
    }

    let state = AppState::new(&config, recognizer, Some(metrics_handle));
    server::serve(&config, state).await
}
