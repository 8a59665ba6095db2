use image::{GrayImage, RgbImage};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Result;
use tracing::debug;

use crate::models::{Rejection, Verdict};
use crate::screening::hsv::HsvImage;
use crate::screening::validate;

/// Data that flows through the screening pipeline
#[derive(Clone)]
pub struct PipelineData {
    /// The input image, shared with every step
    pub image: Arc<RgbImage>,

    /// HSV projection, filled in by the conversion step
    pub hsv: Option<HsvImage>,

    /// Mask produced by the most recent ratio test
    pub mask: Option<GrayImage>,

    /// Measured values keyed by name (e.g. "vegetation_ratio")
    pub metadata: HashMap<String, MetadataValue>,

    /// Set by the first test that rejects; later steps are not run
    pub rejection: Option<Rejection>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Float(f64),
    String(String),
}

impl PipelineData {
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
            hsv: None,
            mask: None,
            metadata: HashMap::new(),
            rejection: None,
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetadataValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self.rejection {
            Some(rejection) => Verdict::Reject(rejection),
            None => Verdict::Accept,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Directory receiving one image per step
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name, also used for debug file names
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order, stopping after the first rejection
    pub fn run(&self, input: RgbImage) -> Result<PipelineData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run at most `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: RgbImage, num_steps: usize) -> Result<PipelineData> {
        validate(&input)?;

        if let Some(debug_config) = &self.context.debug {
            let input_path = debug_config.output_dir.join("00_input.png");
            input.save(&input_path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
            debug!(path = %input_path.display(), "saved debug input");
        }

        let mut data = PipelineData::from_image(input);

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!(step = step.name(), index = step_idx + 1, "running step");
            data = step.process(data, &self.context)?;

            if let Some(debug_config) = &self.context.debug {
                save_debug_output(&data, debug_config, step_idx, step.name())?;
            }

            if let Some(rejection) = &data.rejection {
                debug!(step = step.name(), %rejection, "short-circuit on rejection");
                break;
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Save the mask of a ratio test, or the HSV projection for the conversion step
fn save_debug_output(
    data: &PipelineData,
    debug_config: &DebugConfig,
    step_idx: usize,
    step_name: &str,
) -> Result<()> {
    let filename = format!("{:02}_{}.png", step_idx + 1,
        step_name.to_lowercase().replace(' ', "_"));
    let output_path = debug_config.output_dir.join(&filename);

    let saved = if let Some(mask) = &data.mask {
        mask.save(&output_path)
    } else if let Some(hsv) = &data.hsv {
        hsv.save(&output_path)
    } else {
        return Ok(());
    };
    saved.map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

    debug!(file = %filename, "saved debug output");
    Ok(())
}
