//! # Application Error Types
//!
//! This module defines common error types used throughout the converter.
//! Per-image failures live in [`crate::ocr_errors`]; the errors here are the
//! ones that end a request or stop the server from starting.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Document assembly or serialization errors
    Document(String),
    /// Malformed upload request
    Upload(String),
    /// Upload larger than the configured body limit
    UploadTooLarge(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Document(msg) => write!(f, "[DOCUMENT] {}", msg),
            AppError::Upload(msg) => write!(f, "[UPLOAD] {}", msg),
            AppError::UploadTooLarge(msg) => write!(f, "[UPLOAD_TOO_LARGE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Document(err.to_string())
    }
}

impl AppError {
    /// HTTP status used when the error reaches the web layer
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    use crate::ocr_errors::OcrError;

    /// Log OCR processing errors with image and processing context
    pub fn log_ocr_error(
        error: &OcrError,
        operation: &str,
        filename: Option<&str>,
        image_size: Option<u64>,
        processing_duration: Option<std::time::Duration>,
    ) {
        error!(
            error = %error,
            error_kind = error.kind(),
            operation = %operation,
            filename = ?filename,
            image_size_bytes = ?image_size,
            processing_duration_ms = ?processing_duration.map(|d| d.as_millis()),
            "OCR processing failed"
        );
    }

    /// Log document assembly errors with the size of the batch being exported
    pub fn log_document_error(
        error: &impl std::fmt::Display,
        operation: &str,
        section_count: usize,
    ) {
        error!(
            error = %error,
            operation = %operation,
            section_count = %section_count,
            "Document export failed"
        );
    }

    /// Log malformed upload requests
    pub fn log_upload_error(error: &impl std::fmt::Display, field: Option<&str>) {
        error!(
            error = %error,
            field = ?field,
            "Upload request rejected"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(
        error: &impl std::fmt::Display,
        config_key: &str,
        operation: &str,
    ) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
