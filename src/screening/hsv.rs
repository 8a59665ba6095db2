use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::map::map_colors;

/// HSV raster stored in an RGB-shaped buffer: channel 0 is hue on the
/// half-degree scale (0..=179), channels 1 and 2 are saturation and value (0..=255).
pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Largest hue on the half-degree scale.
pub const HUE_MAX: u8 = 179;

/// Convert a single RGB sample to (hue, saturation, value).
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    if max == 0 {
        return [0, 0, 0];
    }

    let saturation = (delta * 255.0 / max as f32).round() as u8;

    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g as f32 - b as f32) / delta
    } else if max == g {
        120.0 + 60.0 * (b as f32 - r as f32) / delta
    } else {
        240.0 + 60.0 * (r as f32 - g as f32) / delta
    };
    let hue_degrees = if hue_degrees < 0.0 { hue_degrees + 360.0 } else { hue_degrees };

    // 359.x degrees rounds up to 180, which is red again
    let hue = ((hue_degrees / 2.0).round() as u16 % (HUE_MAX as u16 + 1)) as u8;

    [hue, saturation, max]
}

/// Project a whole RGB image into HSV
pub fn to_hsv(image: &RgbImage) -> HsvImage {
    map_colors(image, |pixel: Rgb<u8>| Rgb(rgb_to_hsv(pixel[0], pixel[1], pixel[2])))
}
