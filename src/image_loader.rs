//! # Image Loader
//!
//! Turns the raw bytes of one upload into an 8-bit RGB bitmap. The format is
//! sniffed from the leading magic bytes; the filename only decides whether an
//! upload is offered to the decoder at all.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::ocr_config::OcrConfig;
use crate::ocr_errors::OcrError;

/// File extensions accepted by the upload widget
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif"];

/// One uploaded file, owned by the batch that received it
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Reject uploads whose extension the widget would not have offered
pub fn validate_extension(filename: &str) -> Result<(), OcrError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(OcrError::Validation(format!(
            "'.{}' files are not accepted (expected one of: {})",
            ext,
            ACCEPTED_EXTENSIONS.join(", ")
        ))),
        None => Err(OcrError::Validation(format!(
            "'{}' has no file extension (expected one of: {})",
            filename,
            ACCEPTED_EXTENSIONS.join(", ")
        ))),
    }
}

/// Identify the container format from the first bytes of the upload
pub fn detect_format(bytes: &[u8], config: &OcrConfig) -> Result<ImageFormat, OcrError> {
    if bytes.is_empty() {
        return Err(OcrError::Decode("file is empty".to_string()));
    }

    let header = &bytes[..bytes.len().min(config.buffer_size)];
    let format = image::guess_format(header)
        .map_err(|_| OcrError::Decode("unrecognized image format".to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Tiff => Ok(format),
        other => Err(OcrError::Decode(format!(
            "{:?} images are not supported (expected PNG, JPEG or TIFF)",
            other
        ))),
    }
}

/// Decode an upload into a canonical full-color bitmap
pub fn load_image(bytes: &[u8], config: &OcrConfig) -> Result<DynamicImage, OcrError> {
    let format = detect_format(bytes, config)?;

    let decoded = ImageReader::with_format(Cursor::new(bytes), format).decode()?;
    debug!(
        format = ?format,
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded uploaded image"
    );

    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}
