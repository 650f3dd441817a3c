//! # Shared Types for Image Preprocessing
//!
//! Result types returned by the preprocessing stages.

use std::time::Duration;

use image::GrayImage;

/// Result of the autocontrast stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastResult {
    /// The contrast-stretched image
    pub image: GrayImage,
    /// Darkest and lightest intensities found before stretching.
    /// `None` when the image has no pixels.
    pub input_range: Option<(u8, u8)>,
    /// Whether a remapping was applied (false for flat images)
    pub stretched: bool,
}

/// Output of the full preprocessing pipeline, ready for the OCR engine.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// Single-channel bitmap handed to the recognizer
    pub image: GrayImage,
    /// Intensity range detected by the autocontrast stage
    pub input_range: Option<(u8, u8)>,
    /// Wall time spent in the pipeline
    pub processing_time: Duration,
}
