use anyhow::{anyhow, bail, Result};
use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::models::{Rejection, Verdict};
use crate::screening::PlausibilityFilter;

/// Side length of the square model input
pub const INPUT_SIZE: u32 = 224;
/// Upper end of the severity scale. Model severities outside 0..=9 are
/// clamped onto it rather than passed through.
pub const MAX_SEVERITY: f32 = 9.0;

/// Paddy conditions the model distinguishes, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiseaseLabel {
    BrownSpot,
    Healthy,
    LeafBlast,
    SheathBlight,
}

impl DiseaseLabel {
    pub const ALL: [DiseaseLabel; 4] = [
        DiseaseLabel::BrownSpot,
        DiseaseLabel::Healthy,
        DiseaseLabel::LeafBlast,
        DiseaseLabel::SheathBlight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DiseaseLabel::BrownSpot => "Brown Spot",
            DiseaseLabel::Healthy => "Healthy Plant",
            DiseaseLabel::LeafBlast => "Leaf Blast",
            DiseaseLabel::SheathBlight => "Sheath Blight",
        }
    }

    pub fn is_disease(self) -> bool {
        self != DiseaseLabel::Healthy
    }
}

impl std::fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 224x224x3 samples scaled to [0, 1], row-major HWC
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

/// Raw model heads: per-class probabilities and a severity regression
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub class_probs: Vec<f32>,
    pub severity: f32,
}

/// The trained disease model. Loading and inference live outside this crate.
pub trait DiseaseModel {
    fn predict(&self, input: &ModelInput) -> Result<ModelOutput>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnosis {
    pub label: DiseaseLabel,
    /// 0..=9, two decimals; always 0 for a healthy plant
    pub severity: f32,
}

impl Diagnosis {
    pub fn from_output(output: &ModelOutput) -> Result<Self> {
        let (index, _) = output
            .class_probs
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| anyhow!("Model returned no class probabilities"))?;

        let Some(label) = DiseaseLabel::from_index(index) else {
            bail!("Model returned unknown class index {}", index);
        };

        let severity = if label.is_disease() {
            round_to_hundredths(output.severity.clamp(0.0, MAX_SEVERITY))
        } else {
            0.0
        };

        Ok(Self { label, severity })
    }
}

fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Resize to the model input size and scale samples to [0, 1]
pub fn preprocess(image: &RgbImage) -> ModelInput {
    let resized = imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let data = resized.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

    ModelInput {
        width: INPUT_SIZE,
        height: INPUT_SIZE,
        data,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screening {
    /// The filter turned the image away; the model was not called
    Rejected(Rejection),
    Diagnosed(Diagnosis),
}

/// Runs the plausibility filter and only consults the model on acceptance
pub struct GatedClassifier<M> {
    filter: PlausibilityFilter,
    model: M,
}

impl<M: DiseaseModel> GatedClassifier<M> {
    pub fn new(filter: PlausibilityFilter, model: M) -> Self {
        Self { filter, model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn screen_and_diagnose(&self, image: &RgbImage) -> Result<Screening> {
        match self.filter.evaluate(image)? {
            Verdict::Reject(rejection) => {
                tracing::info!(%rejection, "image rejected before classification");
                Ok(Screening::Rejected(rejection))
            }
            Verdict::Accept => {
                let output = self.model.predict(&preprocess(image))?;
                let diagnosis = Diagnosis::from_output(&output)?;
                tracing::info!(label = %diagnosis.label, severity = diagnosis.severity, "image classified");
                Ok(Screening::Diagnosed(diagnosis))
            }
        }
    }
}
