use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive HSV range, `[hue, saturation, value]` for each bound.
/// Hue uses the half-degree scale (0..=179).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBand {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.lower[0]
            && h <= self.upper[0]
            && s >= self.lower[1]
            && s <= self.upper[1]
            && v >= self.lower[2]
            && v <= self.upper[2]
    }
}

pub const GREEN_BAND: HsvBand = HsvBand::new([20, 40, 40], [95, 255, 255]);
pub const YELLOW_BROWN_BAND: HsvBand = HsvBand::new([8, 40, 40], [40, 255, 255]);
pub const GRAY_BAND: HsvBand = HsvBand::new([0, 0, 60], [179, 30, 230]);
pub const SKIN_BAND: HsvBand = HsvBand::new([0, 40, 150], [15, 160, 255]);

/// Value above which a pixel counts as blown out (~92% of 255)
pub const OVEREXPOSED_VALUE: u8 = 235;
/// Value below which a pixel counts as crushed (~10% of 255)
pub const UNDEREXPOSED_VALUE: u8 = 25;

pub const MIN_PLANT_RATIO: f64 = 0.08;
pub const MAX_GRAY_RATIO: f64 = 0.40;
pub const MAX_SKIN_RATIO: f64 = 0.12;
pub const MAX_OVEREXPOSED_RATIO: f64 = 0.45;
pub const MAX_UNDEREXPOSED_RATIO: f64 = 0.55;

/// Every tunable threshold of the plausibility filter.
///
/// Missing fields in a config file fall back to the defaults above, so a file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub green_band: HsvBand,
    pub yellow_brown_band: HsvBand,
    pub gray_band: HsvBand,
    pub skin_band: HsvBand,
    pub overexposed_value: u8,
    pub underexposed_value: u8,
    pub min_plant_ratio: f64,
    pub max_gray_ratio: f64,
    pub max_skin_ratio: f64,
    pub max_overexposed_ratio: f64,
    pub max_underexposed_ratio: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            green_band: GREEN_BAND,
            yellow_brown_band: YELLOW_BROWN_BAND,
            gray_band: GRAY_BAND,
            skin_band: SKIN_BAND,
            overexposed_value: OVEREXPOSED_VALUE,
            underexposed_value: UNDEREXPOSED_VALUE,
            min_plant_ratio: MIN_PLANT_RATIO,
            max_gray_ratio: MAX_GRAY_RATIO,
            max_skin_ratio: MAX_SKIN_RATIO,
            max_overexposed_ratio: MAX_OVEREXPOSED_RATIO,
            max_underexposed_ratio: MAX_UNDEREXPOSED_RATIO,
        }
    }
}

impl FilterConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse filter config")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter config {}", path.display()))?;
        Self::from_json_str(&json)
    }
}
