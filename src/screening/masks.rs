use image::{GrayImage, Luma, Rgb};
use imageproc::map::{map_colors, map_colors2};
use imageproc::stats::histogram;

use super::config::HsvBand;
use super::hsv::HsvImage;

/// Mask value for pixels that satisfy the predicate
pub const MASK_ON: u8 = 255;

fn mask_pixel(on: bool) -> Luma<u8> {
    if on { Luma([MASK_ON]) } else { Luma([0]) }
}

/// Mark pixels whose hue, saturation and value all fall inside the band
pub fn in_range(hsv: &HsvImage, band: &HsvBand) -> GrayImage {
    map_colors(hsv, |pixel: Rgb<u8>| mask_pixel(band.contains(pixel[0], pixel[1], pixel[2])))
}

/// Pixel-wise OR of two masks of the same size
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    map_colors2(a, b, |p: Luma<u8>, q: Luma<u8>| Luma([p[0].max(q[0])]))
}

/// Mark pixels with value strictly above `threshold`
pub fn value_above(hsv: &HsvImage, threshold: u8) -> GrayImage {
    map_colors(hsv, |pixel: Rgb<u8>| mask_pixel(pixel[2] > threshold))
}

/// Mark pixels with value strictly below `threshold`
pub fn value_below(hsv: &HsvImage, threshold: u8) -> GrayImage {
    map_colors(hsv, |pixel: Rgb<u8>| mask_pixel(pixel[2] < threshold))
}

/// Number of pixels set in the mask
pub fn count(mask: &GrayImage) -> u64 {
    histogram(mask).channels[0][MASK_ON as usize] as u64
}

/// Fraction of the mask that is set.
///
/// Callers validate that the image has at least one pixel; the denominator is
/// still clamped so an empty mask reads as 0.0 rather than NaN.
pub fn coverage(mask: &GrayImage) -> f64 {
    let total = (mask.width() as u64 * mask.height() as u64).max(1);
    count(mask) as f64 / total as f64
}
