//! Request handlers for the web server.

use askama::Template;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::templates::{IndexTemplate, ResultsTemplate};
use super::AppState;
use crate::batch::{process_batch, BatchOutcome};
use crate::errors::{error_logging, AppError, AppResult};
use crate::image_loader::UploadedImage;
use crate::observability;

/// Multipart field carrying the uploaded images
pub const FILES_FIELD: &str = "files";

fn render(template: &impl Template) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
}

/// Upload page.
pub async fn index() -> AppResult<Html<String>> {
    render(&IndexTemplate::default())
}

/// Run the conversion for every file in the form and render the results.
pub async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    let uploads = read_uploads(&mut multipart).await?;
    tracing::info!(files = uploads.len(), "Received conversion request");

    let recognizer = state.recognizer.clone();
    let ocr_config = state.ocr_config.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        process_batch(uploads, recognizer.as_ref(), &ocr_config)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))??;

    match outcome {
        BatchOutcome::Idle => render(&IndexTemplate::default()),
        BatchOutcome::Completed { items, artifact } => {
            render(&ResultsTemplate::new(&items, artifact.as_ref()))
        }
    }
}

/// Collect the non-empty parts of the `files` field, in form order.
///
/// Browsers submit an empty part with an empty filename when no file was
/// chosen; those parts are skipped.
async fn read_uploads(multipart: &mut Multipart) -> AppResult<Vec<UploadedImage>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, None))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, Some(FILES_FIELD)))?;

        if filename.is_empty() && bytes.is_empty() {
            continue;
        }

        uploads.push(UploadedImage::new(filename, bytes.to_vec()));
    }

    Ok(uploads)
}

/// A body cut off by the request size limit surfaces here as a multipart
/// read error; keep its 413 status.
fn upload_error(err: MultipartError, field: Option<&str>) -> AppError {
    error_logging::log_upload_error(&err, field);
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::UploadTooLarge(err.body_text()),
        _ => AppError::Upload(err.body_text()),
    }
}

/// Liveness probe.
pub async fn health_live() -> &'static str {
    "OK"
}

/// Readiness probe: the service is only useful with a working OCR engine.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    match observability::check_ocr_health(state.recognizer.clone()).await {
        Ok(()) => (StatusCode::OK, "OK".to_string()),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}
