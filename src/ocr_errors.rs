//! # OCR Error Types Module
//!
//! Per-image failures of the conversion pipeline. None of these abort a batch
//! on their own; they are reported next to the file that caused them.

/// Custom error types for OCR operations
#[derive(Debug, Clone, PartialEq)]
pub enum OcrError {
    /// Upload rejected before decoding (file type not accepted)
    Validation(String),
    /// Bytes are not a supported, decodable image
    Decode(String),
    /// The OCR executable could not be started
    EngineUnavailable(String),
    /// The OCR engine ran but failed on this bitmap
    Recognition(String),
}

impl OcrError {
    /// Short message suitable for showing next to the offending file
    pub fn user_message(&self) -> String {
        match self {
            OcrError::Validation(msg) => format!("File rejected: {}", msg),
            OcrError::Decode(msg) => format!("Could not read this image: {}", msg),
            OcrError::EngineUnavailable(_) => {
                "The OCR engine is not installed on this server.".to_string()
            }
            OcrError::Recognition(msg) => format!("Text recognition failed: {}", msg),
        }
    }

    /// Stable label for the `error_kind` log field
    pub fn kind(&self) -> &'static str {
        match self {
            OcrError::Validation(_) => "validation",
            OcrError::Decode(_) => "decode",
            OcrError::EngineUnavailable(_) => "engine_unavailable",
            OcrError::Recognition(_) => "recognition",
        }
    }

    /// Whether every later recognition call is bound to fail the same way
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, OcrError::EngineUnavailable(_))
    }
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrError::Validation(msg) => write!(f, "[VALIDATION] Upload validation failed: {}", msg),
            OcrError::Decode(msg) => write!(f, "[DECODE] Failed to decode uploaded image: {}", msg),
            OcrError::EngineUnavailable(msg) => write!(f, "[OCR_ENGINE] OCR engine unavailable: {}", msg),
            OcrError::Recognition(msg) => write!(f, "[OCR_RECOGNIZE] Text recognition failed: {}", msg),
        }
    }
}

impl std::error::Error for OcrError {}

impl From<image::ImageError> for OcrError {
    fn from(err: image::ImageError) -> Self {
        OcrError::Decode(err.to_string())
    }
}
