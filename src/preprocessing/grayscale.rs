//! # Grayscale Conversion
//!
//! RGB to single-channel luma using the ITU-R 601-2 weights in 16.16 fixed
//! point, so the same pixels always give the same byte on every platform.
//!
//! `DynamicImage::to_luma8` uses Rec. 709 weights in floating point; this
//! conversion reproduces PIL's `convert("L")` byte for byte instead.

use image::{DynamicImage, GrayImage, Luma};

const RED_WEIGHT: u32 = 19595; // 0.299 * 65536
const GREEN_WEIGHT: u32 = 38470; // 0.587 * 65536
const BLUE_WEIGHT: u32 = 7471; // 0.114 * 65536

/// Luma of one RGB triple.
#[inline]
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted =
        u32::from(r) * RED_WEIGHT + u32::from(g) * GREEN_WEIGHT + u32::from(b) * BLUE_WEIGHT;
    ((weighted + 0x8000) >> 16) as u8
}

/// Convert any bitmap to single-channel grayscale.
///
/// Alpha is discarded, not composited.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        gray.put_pixel(x, y, Luma([luma_601(r, g, b)]));
    }

    gray
}
