//! # OCR Processing Module
//!
//! Text recognition for preprocessed bitmaps using the Tesseract OCR engine.
//!
//! ## Features
//!
//! - [`TextRecognizer`] seam so the batch loop can run against any engine
//! - [`TesseractCli`], which drives the locally installed `tesseract` executable
//! - Blank-result detection via [`is_blank`]
//!
//! The engine is invoked as
//! `tesseract <image.png> stdout -l eng --oem 3 --psm 3`: English dictionary,
//! fully automatic page segmentation and the default engine mode. Its output
//! is returned verbatim, line breaks included.

use std::io::ErrorKind;
use std::process::Command;
use std::time::Instant;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::document::is_space;
use crate::observability;
pub use crate::ocr_config::OcrConfig;
pub use crate::ocr_errors::OcrError;

/// A blocking OCR engine.
///
/// Implementations are called from a blocking worker thread, one bitmap at a
/// time, and must be shareable across requests.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in a grayscale bitmap.
    ///
    /// An empty or whitespace-only string is a valid result, not an error.
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;

    /// Whether the engine can currently be started at all.
    fn is_available(&self) -> bool;
}

/// Whether recognized text contains nothing but whitespace.
///
/// Tesseract terminates every page with a form feed, so an empty page comes
/// back as `"\x0c"` rather than `""`.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_space)
}

/// Tesseract driven through its command-line interface.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Write the bitmap to a scratch PNG the executable can read.
    ///
    /// The file is deleted when the returned handle is dropped.
    fn write_scratch_png(&self, image: &GrayImage) -> Result<tempfile::NamedTempFile, OcrError> {
        let scratch = tempfile::Builder::new()
            .prefix("ocr-input-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("Failed to create scratch file: {e}")))?;

        image
            .save_with_format(scratch.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("Failed to write scratch image: {e}")))?;

        Ok(scratch)
    }

    fn run_tesseract(&self, image_path: &std::path::Path) -> Result<String, OcrError> {
        let output = Command::new(&self.config.tesseract_cmd)
            .arg(image_path)
            .arg("stdout")
            .args(self.config.engine_args())
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::Recognition(format!(
                        "tesseract exited with {}: {}",
                        output.status,
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::PermissionDenied => {
                Err(OcrError::EngineUnavailable(format!(
                    "cannot run {} ({e})",
                    self.config.tesseract_cmd.display()
                )))
            }
            Err(e) => Err(OcrError::Recognition(format!("Failed to start tesseract: {e}"))),
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        let span = observability::ocr_span("recognize");
        let _enter = span.enter();

        let start_time = Instant::now();
        let scratch = self.write_scratch_png(image)?;
        let result = self.run_tesseract(scratch.path());
        let duration = start_time.elapsed();

        match &result {
            Ok(text) => {
                observability::record_ocr_metrics(true, duration);
                info!(
                    "OCR processing completed in {}ms, extracted {} characters",
                    duration.as_millis(),
                    text.chars().count()
                );
            }
            Err(err) => {
                observability::record_ocr_metrics(false, duration);
                warn!("OCR processing failed after {}ms: {}", duration.as_millis(), err);
            }
        }

        result
    }

    fn is_available(&self) -> bool {
        let available = Command::new(&self.config.tesseract_cmd)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);

        debug!(
            tesseract_cmd = %self.config.tesseract_cmd.display(),
            available,
            "Checked OCR engine availability"
        );
        available
    }
}
