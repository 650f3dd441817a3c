//! # Image Filtering Module
//!
//! Fixed 3x3 convolution used to sharpen text edges before recognition.

use image::{GrayImage, Luma};

/// Sharpening kernel, row-major, before normalization
pub const SHARPEN_KERNEL: [f32; 9] = [
    -2.0, -2.0, -2.0, //
    -2.0, 32.0, -2.0, //
    -2.0, -2.0, -2.0,
];

/// Divisor applied to every kernel weight (the kernel sums to it)
pub const SHARPEN_SCALE: f32 = 16.0;

/// Round half up and clamp a filter response into a byte.
#[inline]
fn clip8(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        (value + 0.5).min(255.0) as u8
    }
}

/// Applies a normalized 3x3 kernel to a grayscale image.
///
/// The outermost row and column on each side have no full neighbourhood and
/// are copied from the input unchanged. Images with a side shorter than three
/// pixels are returned as they are.
pub fn filter_3x3(image: &GrayImage, kernel: &[f32; 9], scale: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut output = image.clone();

    if width < 3 || height < 3 {
        return output;
    }

    let weights: Vec<f32> = kernel.iter().map(|k| k / scale).collect();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = 0.0f32;
            for ky in 0..3u32 {
                for kx in 0..3u32 {
                    let pixel = image.get_pixel(x + kx - 1, y + ky - 1);
                    sum += f32::from(pixel[0]) * weights[(ky * 3 + kx) as usize];
                }
            }
            output.put_pixel(x, y, Luma([clip8(sum)]));
        }
    }

    output
}

/// Sharpen a grayscale image with the fixed [`SHARPEN_KERNEL`].
pub fn sharpen(image: &GrayImage) -> GrayImage {
    let sharpened = filter_3x3(image, &SHARPEN_KERNEL, SHARPEN_SCALE);

    tracing::debug!(
        target: "ocr_preprocessing",
        "Sharpen applied: dimensions={}x{}",
        sharpened.width(),
        sharpened.height()
    );

    sharpened
}
