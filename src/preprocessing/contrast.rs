//! # Autocontrast Module
//!
//! Stretches the intensity histogram so the darkest pixel present maps to 0
//! and the lightest maps to 255. No histogram cutoff is applied.

use image::{GrayImage, Luma};

use super::types::ContrastResult;

/// Build the 256-entry remapping table for an observed `lo..=hi` range.
///
/// Values are truncated toward zero after scaling, then clamped, so
/// `lut[lo] == 0` and `lut[hi] == 255`.
pub fn autocontrast_lut(lo: u8, hi: u8) -> [u8; 256] {
    let mut lut = [0u8; 256];

    if hi <= lo {
        for (value, slot) in lut.iter_mut().enumerate() {
            *slot = value as u8;
        }
        return lut;
    }

    let scale = 255.0_f64 / f64::from(hi - lo);
    let offset = -f64::from(lo) * scale;

    for (value, slot) in lut.iter_mut().enumerate() {
        let mapped = (value as f64 * scale + offset) as i64;
        *slot = mapped.clamp(0, 255) as u8;
    }

    lut
}

/// Darkest and lightest intensities present, or `None` for an empty image.
pub fn intensity_range(image: &GrayImage) -> Option<(u8, u8)> {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let lo = histogram.iter().position(|&count| count > 0)?;
    let hi = histogram.iter().rposition(|&count| count > 0)?;
    Some((lo as u8, hi as u8))
}

/// Maximize contrast by remapping the observed range onto 0..=255.
pub fn autocontrast(image: &GrayImage) -> ContrastResult {
    let range = intensity_range(image);

    let (lo, hi) = match range {
        Some((lo, hi)) if hi > lo => (lo, hi),
        _ => {
            return ContrastResult {
                image: image.clone(),
                input_range: range,
                stretched: false,
            }
        }
    };

    let lut = autocontrast_lut(lo, hi);
    let (width, height) = image.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        output.put_pixel(x, y, Luma([lut[pixel[0] as usize]]));
    }

    tracing::debug!(
        target: "ocr_preprocessing",
        "Autocontrast stretched range {}..={} onto 0..=255",
        lo,
        hi
    );

    ContrastResult {
        image: output,
        input_range: range,
        stretched: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(values: &[u8]) -> GrayImage {
        let mut img = GrayImage::new(values.len() as u32, 1);
        for (x, &v) in values.iter().enumerate() {
            img.put_pixel(x as u32, 0, Luma([v]));
        }
        img
    }

    #[test]
    fn test_lut_endpoints() {
        let lut = autocontrast_lut(50, 200);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[50], 0);
        assert_eq!(lut[200], 255);
        assert_eq!(lut[255], 255);
        // 125 * 1.7 - 85 = 127.5, truncated
        assert_eq!(lut[125], 127);
    }

    #[test]
    fn test_lut_is_monotonic() {
        let lut = autocontrast_lut(13, 87);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_flat_range_is_identity() {
        let lut = autocontrast_lut(90, 90);
        assert!(lut.iter().enumerate().all(|(i, &v)| v as usize == i));
    }

    #[test]
    fn test_autocontrast_stretches_full_range() {
        let img = ramp(&[100, 110, 120, 130, 140]);
        let result = autocontrast(&img);

        assert!(result.stretched);
        assert_eq!(result.input_range, Some((100, 140)));
        assert_eq!(result.image.get_pixel(0, 0)[0], 0);
        assert_eq!(result.image.get_pixel(4, 0)[0], 255);
    }

    #[test]
    fn test_autocontrast_leaves_flat_image_alone() {
        let img = ramp(&[42, 42, 42]);
        let result = autocontrast(&img);

        assert!(!result.stretched);
        assert_eq!(result.input_range, Some((42, 42)));
        assert_eq!(result.image, img);
    }

    #[test]
    fn test_autocontrast_empty_image() {
        let img = GrayImage::new(0, 0);
        let result = autocontrast(&img);

        assert_eq!(result.input_range, None);
        assert!(!result.stretched);
    }

    #[test]
    fn test_full_range_image_is_unchanged() {
        let img = ramp(&[0, 64, 128, 255]);
        let result = autocontrast(&img);
        assert_eq!(result.image, img);
    }
}
