pub mod checks;
pub mod config;
pub mod hsv;
pub mod masks;
pub mod steps;

use image::{DynamicImage, RgbImage};
use std::sync::Arc;

use crate::error::InvalidInputError;
use crate::models::{PlausibilityReport, Verdict};
use crate::pipeline::Pipeline;
use checks::Check;
use config::FilterConfig;

/// Pre-classification gate deciding whether a photo looks like a plant.
///
/// Pure: no logging, no I/O, nothing retained between calls.
#[derive(Debug, Clone, Default)]
pub struct PlausibilityFilter {
    config: FilterConfig,
}

impl PlausibilityFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Run the ratio tests in order and stop at the first rejection
    pub fn evaluate(&self, image: &RgbImage) -> Result<Verdict, InvalidInputError> {
        validate(image)?;
        let hsv = hsv::to_hsv(image);

        for check in Check::ORDER {
            if let (_, Some(rejection)) = check.run(&hsv, &self.config) {
                return Ok(Verdict::Reject(rejection));
            }
        }

        Ok(Verdict::Accept)
    }

    pub fn is_plausible(&self, image: &RgbImage) -> Result<bool, InvalidInputError> {
        Ok(self.evaluate(image)?.is_accept())
    }

    /// Measure every ratio, then derive the verdict in evaluation order
    pub fn measure(&self, image: &RgbImage) -> Result<PlausibilityReport, InvalidInputError> {
        validate(image)?;
        let hsv = hsv::to_hsv(image);

        let mut ratios = [0.0; 5];
        let mut verdict = Verdict::Accept;
        for (slot, check) in ratios.iter_mut().zip(Check::ORDER) {
            let (ratio, rejection) = check.run(&hsv, &self.config);
            *slot = ratio;
            if let (Verdict::Accept, Some(rejection)) = (verdict, rejection) {
                verdict = Verdict::Reject(rejection);
            }
        }

        let [plant_ratio, gray_ratio, skin_ratio, overexposed_ratio, underexposed_ratio] = ratios;
        Ok(PlausibilityReport {
            plant_ratio,
            gray_ratio,
            skin_ratio,
            overexposed_ratio,
            underexposed_ratio,
            verdict,
        })
    }
}

/// Reject rasters without a single pixel
pub fn validate(image: &RgbImage) -> Result<(), InvalidInputError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(InvalidInputError::EmptyImage { width, height });
    }
    Ok(())
}

/// Wrap a raw interleaved RGB buffer, checking that it matches the dimensions
pub fn rgb_from_raw(width: u32, height: u32, buffer: Vec<u8>) -> Result<RgbImage, InvalidInputError> {
    let expected = width as usize * height as usize * 3;
    if buffer.len() != expected {
        return Err(InvalidInputError::BufferSize {
            width,
            height,
            expected,
            actual: buffer.len(),
        });
    }

    let image = RgbImage::from_raw(width, height, buffer).ok_or(InvalidInputError::BufferSize {
        width,
        height,
        expected,
        actual: expected,
    })?;
    validate(&image)?;
    Ok(image)
}

/// Flatten any decoded image (alpha, grayscale, 16-bit) to 8-bit RGB
pub fn rgb_from_dynamic(image: &DynamicImage) -> Result<RgbImage, InvalidInputError> {
    let rgb = image.to_rgb8();
    validate(&rgb)?;
    Ok(rgb)
}

/// Build the standard screening pipeline: HSV conversion then the five tests
pub fn build_screening_pipeline(config: FilterConfig) -> Pipeline {
    use steps::{HsvConversionStep, RatioTestStep};

    let config = Arc::new(config);
    let pipeline = Pipeline::new().add_step(Arc::new(HsvConversionStep));

    Check::ORDER.into_iter().fold(pipeline, |pipeline, check| {
        pipeline.add_step(Arc::new(RatioTestStep::new(check, config.clone())))
    })
}
