//! # Batch Conversion
//!
//! The per-request loop behind the upload page. Each upload is taken through
//! extension check, decode, preview, preprocessing and recognition strictly in
//! upload order. Failures stay with the file that caused them; only a
//! document serialization failure ends the batch.

use std::io::Cursor;
use std::time::Instant;

use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use tracing::{info, warn};

use crate::document::{DocumentBuilder, OutputArtifact};
use crate::errors::{error_logging, AppResult};
use crate::image_loader::{load_image, validate_extension, UploadedImage};
use crate::observability;
use crate::ocr::{is_blank, OcrConfig, OcrError, TextRecognizer};
use crate::preprocessing::preprocess;

/// Inline rendering of an uploaded image for the results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`
    pub data_uri: String,
}

impl Preview {
    /// Re-encode a decoded bitmap as PNG and wrap it in a data URI.
    pub fn from_image(image: &DynamicImage) -> Result<Self, image::ImageError> {
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
        Ok(Self {
            width: image.width(),
            height: image.height(),
            data_uri: format!("data:image/png;base64,{encoded}"),
        })
    }
}

/// What became of one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// Recognition produced visible text, kept verbatim
    Text(String),
    /// Recognition succeeded but found nothing but whitespace
    NoText,
    /// The file never made it through recognition
    Failed(OcrError),
}

impl ItemOutcome {
    /// Label used for the `images_processed_total` counter
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Text(_) => "text",
            ItemOutcome::NoText => "no_text",
            ItemOutcome::Failed(_) => "failed",
        }
    }

    /// Whether the OCR engine returned a result for this file
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ItemOutcome::Failed(_))
    }
}

/// Everything the results page shows for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    /// 1-based position in the upload
    pub index: usize,
    pub filename: String,
    pub preview: Option<Preview>,
    pub outcome: ItemOutcome,
}

/// Final state of one conversion request.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Nothing was uploaded
    Idle,
    /// Every upload was handled; `artifact` is present when at least one
    /// file went through recognition
    Completed {
        items: Vec<ItemReport>,
        artifact: Option<OutputArtifact>,
    },
}

impl BatchOutcome {
    pub fn items(&self) -> &[ItemReport] {
        match self {
            BatchOutcome::Idle => &[],
            BatchOutcome::Completed { items, .. } => items,
        }
    }

    pub fn artifact(&self) -> Option<&OutputArtifact> {
        match self {
            BatchOutcome::Idle => None,
            BatchOutcome::Completed { artifact, .. } => artifact.as_ref(),
        }
    }
}

/// Convert a batch of uploads into per-file reports and one document.
///
/// Blocking: runs the OCR engine once per file, sequentially. Call it from a
/// blocking worker when on an async runtime.
pub fn process_batch(
    uploads: Vec<UploadedImage>,
    recognizer: &dyn TextRecognizer,
    config: &OcrConfig,
) -> AppResult<BatchOutcome> {
    if uploads.is_empty() {
        observability::record_batch("idle");
        return Ok(BatchOutcome::Idle);
    }

    let span = observability::batch_span(uploads.len());
    let _enter = span.enter();
    let start_time = Instant::now();

    info!("Found {} file(s). Processing...", uploads.len());

    let mut builder = DocumentBuilder::new();
    let mut items = Vec::with_capacity(uploads.len());
    let mut engine_down: Option<OcrError> = None;

    for (offset, upload) in uploads.into_iter().enumerate() {
        let report = process_item(offset + 1, upload, recognizer, config, &mut engine_down);

        if let ItemOutcome::Text(text) = &report.outcome {
            builder.add_section(&report.filename, text);
        }

        observability::record_image_outcome(report.outcome.label());
        items.push(report);
    }

    let artifact = if items.iter().any(|item| item.outcome.is_recognized()) {
        let section_count = builder.len();
        let artifact = builder.serialize().map_err(|err| {
            error_logging::log_document_error(&err, "serialize", section_count);
            err
        })?;
        observability::record_document_size(artifact.len());
        Some(artifact)
    } else {
        None
    };

    info!(
        files = items.len(),
        with_text = items.iter().filter(|i| matches!(i.outcome, ItemOutcome::Text(_))).count(),
        failed = items.iter().filter(|i| !i.outcome.is_recognized()).count(),
        document = artifact.is_some(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Batch completed"
    );
    observability::record_batch("completed");

    Ok(BatchOutcome::Completed { items, artifact })
}

fn process_item(
    index: usize,
    upload: UploadedImage,
    recognizer: &dyn TextRecognizer,
    config: &OcrConfig,
    engine_down: &mut Option<OcrError>,
) -> ItemReport {
    let UploadedImage { filename, bytes } = upload;
    let start_time = Instant::now();

    let failed = |filename: String, preview: Option<Preview>, err: OcrError| {
        error_logging::log_ocr_error(
            &err,
            "process_item",
            Some(filename.as_str()),
            Some(bytes.len() as u64),
            Some(start_time.elapsed()),
        );
        ItemReport {
            index,
            filename,
            preview,
            outcome: ItemOutcome::Failed(err),
        }
    };

    if let Err(err) = validate_extension(&filename) {
        return failed(filename, None, err);
    }

    let image = match load_image(&bytes, config) {
        Ok(image) => image,
        Err(err) => return failed(filename, None, err),
    };

    let preview = match Preview::from_image(&image) {
        Ok(preview) => Some(preview),
        Err(err) => {
            warn!(filename = %filename, error = %err, "Could not render preview");
            None
        }
    };

    if let Some(err) = engine_down.as_ref() {
        warn!(filename = %filename, "Skipping recognition, OCR engine is unavailable");
        return failed(filename, preview, err.clone());
    }

    let prepared = preprocess(&image);
    observability::record_preprocess_metrics(prepared.processing_time);

    match recognizer.recognize(&prepared.image) {
        Ok(text) if is_blank(&text) => {
            warn!("No text found in file {}.", filename);
            ItemReport {
                index,
                filename,
                preview,
                outcome: ItemOutcome::NoText,
            }
        }
        Ok(text) => ItemReport {
            index,
            filename,
            preview,
            outcome: ItemOutcome::Text(text),
        },
        Err(err) => {
            if err.is_engine_unavailable() {
                *engine_down = Some(err.clone());
            }
            failed(filename, preview, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _image: &GrayImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct MissingEngine {
        calls: AtomicUsize,
    }

    impl TextRecognizer for MissingEngine {
        fn recognize(&self, _image: &GrayImage) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(OcrError::EngineUnavailable("not installed".to_string()))
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    fn png_upload(name: &str) -> UploadedImage {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([240, 240, 240])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        UploadedImage::new(name, out.into_inner())
    }

    #[test]
    fn test_empty_batch_is_idle() {
        let outcome = process_batch(Vec::new(), &FixedText("x"), &OcrConfig::default()).unwrap();
        assert_eq!(outcome, BatchOutcome::Idle);
        assert!(outcome.artifact().is_none());
    }

    #[test]
    fn test_preview_is_png_data_uri() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(3, 2));
        let preview = Preview::from_image(&img).unwrap();
        assert_eq!((preview.width, preview.height), (3, 2));
        assert!(preview.data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_engine_is_not_called_again_after_it_is_missing() {
        let engine = MissingEngine {
            calls: AtomicUsize::new(0),
        };
        let uploads = vec![png_upload("a.png"), png_upload("b.png"), png_upload("c.png")];

        let outcome = process_batch(uploads, &engine, &OcrConfig::default()).unwrap();

        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert!(outcome
            .items()
            .iter()
            .all(|item| matches!(&item.outcome, ItemOutcome::Failed(e) if e.is_engine_unavailable())));
        assert!(outcome.artifact().is_none());
    }

    #[test]
    fn test_rejected_extension_has_no_preview() {
        let upload = png_upload("scan.bmp");

        let outcome = process_batch(vec![upload], &FixedText("x"), &OcrConfig::default()).unwrap();
        let item = &outcome.items()[0];

        assert!(matches!(item.outcome, ItemOutcome::Failed(OcrError::Validation(_))));
        assert!(item.preview.is_none());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ItemOutcome::Text("a".into()).label(), "text");
        assert_eq!(ItemOutcome::NoText.label(), "no_text");
        assert_eq!(
            ItemOutcome::Failed(OcrError::Decode("x".into())).label(),
            "failed"
        );
    }
}
