//! # Image Preprocessing Module
//!
//! Fixed pipeline that prepares a decoded upload for the OCR engine:
//! grayscale, then autocontrast, then a 3x3 sharpen. There are no tunable
//! parameters and no hidden state, so a given bitmap always yields the same
//! output bytes.
//!
//! The module is organized into focused sub-modules:
//! - `grayscale`: ITU-R 601-2 luma conversion
//! - `contrast`: histogram stretch (autocontrast)
//! - `filtering`: 3x3 convolution and the sharpen kernel
//! - `types`: Shared result types

pub mod contrast;
pub mod filtering;
pub mod grayscale;
pub mod types;

use image::DynamicImage;

// Re-export commonly used types and functions for convenience
pub use contrast::{autocontrast, autocontrast_lut, intensity_range};
pub use filtering::{filter_3x3, sharpen};
pub use grayscale::to_grayscale;
pub use types::{ContrastResult, PreprocessedImage};

/// Run the full preprocessing pipeline on a decoded bitmap.
///
/// # Examples
///
/// ```
/// use image::{DynamicImage, RgbImage, Rgb};
/// use image_to_word::preprocessing::preprocess;
///
/// let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([120, 120, 120])));
/// let first = preprocess(&img);
/// let second = preprocess(&img);
/// assert_eq!(first.image, second.image);
/// ```
pub fn preprocess(image: &DynamicImage) -> PreprocessedImage {
    let start_time = std::time::Instant::now();

    let gray = to_grayscale(image);
    let contrast = autocontrast(&gray);
    let sharpened = sharpen(&contrast.image);

    let processing_time = start_time.elapsed();

    tracing::debug!(
        target: "ocr_preprocessing",
        "Preprocessing completed in {}ms: dimensions={}x{}, input_range={:?}",
        processing_time.as_millis(),
        sharpened.width(),
        sharpened.height(),
        contrast.input_range
    );

    PreprocessedImage {
        image: sharpened,
        input_range: contrast.input_range,
        processing_time,
    }
}
