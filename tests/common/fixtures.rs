use image::{Rgb, RgbImage};

/// H 60, S 153, V 160: inside the green band
pub const MID_GREEN: [u8; 3] = [64, 160, 64];
/// H 120, S 153, V 160: outside every band
pub const MID_BLUE: [u8; 3] = [64, 64, 160];
/// S 0, V 128: inside the gray band
pub const MID_GRAY: [u8; 3] = [128, 128, 128];
/// H 11, S 96, V 224: inside the skin band (and the yellow/brown band)
pub const SKIN: [u8; 3] = [224, 172, 140];
pub const BLACK: [u8; 3] = [0, 0, 0];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Creates a uniform image
pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Creates a 10x10 image filled row-major with `count` pixels of each color.
/// Counts must add up to 100, so each pixel is exactly one percent.
pub fn percent_mix(parts: &[(u32, [u8; 3])]) -> RgbImage {
    let total: u32 = parts.iter().map(|(count, _)| count).sum();
    assert_eq!(total, 100, "percent_mix parts must add up to 100");

    let mut colors = parts
        .iter()
        .flat_map(|&(count, color)| std::iter::repeat_n(color, count as usize));
    RgbImage::from_fn(10, 10, |_, _| Rgb(colors.next().unwrap_or(BLACK)))
}
