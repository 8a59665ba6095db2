use image::GrayImage;

use super::config::FilterConfig;
use super::hsv::HsvImage;
use super::masks;
use crate::models::Rejection;

/// The five ratio tests, in the order they are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Vegetation,
    Metallic,
    Skin,
    Overexposure,
    Underexposure,
}

impl Check {
    pub const ORDER: [Check; 5] = [
        Check::Vegetation,
        Check::Metallic,
        Check::Skin,
        Check::Overexposure,
        Check::Underexposure,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::Vegetation => "vegetation",
            Check::Metallic => "metallic",
            Check::Skin => "skin",
            Check::Overexposure => "overexposure",
            Check::Underexposure => "underexposure",
        }
    }

    /// Build the mask this test counts
    pub fn mask(self, hsv: &HsvImage, config: &FilterConfig) -> GrayImage {
        match self {
            Check::Vegetation => masks::union(
                &masks::in_range(hsv, &config.green_band),
                &masks::in_range(hsv, &config.yellow_brown_band),
            ),
            Check::Metallic => masks::in_range(hsv, &config.gray_band),
            Check::Skin => masks::in_range(hsv, &config.skin_band),
            Check::Overexposure => masks::value_above(hsv, config.overexposed_value),
            Check::Underexposure => masks::value_below(hsv, config.underexposed_value),
        }
    }

    pub fn cutoff(self, config: &FilterConfig) -> f64 {
        match self {
            Check::Vegetation => config.min_plant_ratio,
            Check::Metallic => config.max_gray_ratio,
            Check::Skin => config.max_skin_ratio,
            Check::Overexposure => config.max_overexposed_ratio,
            Check::Underexposure => config.max_underexposed_ratio,
        }
    }

    /// Vegetation rejects below its cutoff, every other test above it.
    /// A ratio exactly at the cutoff always passes.
    pub fn judge(self, ratio: f64, config: &FilterConfig) -> Option<Rejection> {
        let cutoff = self.cutoff(config);
        let rejects = match self {
            Check::Vegetation => ratio < cutoff,
            _ => ratio > cutoff,
        };
        rejects.then_some(Rejection {
            check: self,
            ratio,
            cutoff,
        })
    }

    /// Mask, measure and judge in one go
    pub fn run(self, hsv: &HsvImage, config: &FilterConfig) -> (f64, Option<Rejection>) {
        let ratio = masks::coverage(&self.mask(hsv, config));
        (ratio, self.judge(ratio, config))
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
