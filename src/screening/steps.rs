use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use crate::screening::checks::Check;
use crate::screening::config::FilterConfig;
use crate::screening::{hsv, masks, validate};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Project the input into HSV
pub struct HsvConversionStep;

impl PipelineStep for HsvConversionStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        validate(&data.image)?;
        data.hsv = Some(hsv::to_hsv(&data.image));
        data.mask = None;
        Ok(data)
    }

    fn name(&self) -> &str {
        "HSV Conversion"
    }
}

/// One of the five ratio tests; records its ratio and, if it fires, the rejection
pub struct RatioTestStep {
    check: Check,
    config: Arc<FilterConfig>,
    name: String,
}

impl RatioTestStep {
    pub fn new(check: Check, config: Arc<FilterConfig>) -> Self {
        Self {
            check,
            config,
            name: format!("{} test", check.name()),
        }
    }

    pub fn check(&self) -> Check {
        self.check
    }
}

impl PipelineStep for RatioTestStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let hsv = data.hsv.as_ref()
            .ok_or_else(|| anyhow::anyhow!("Missing HSV projection for {}", self.name))?;

        let mask = self.check.mask(hsv, &self.config);
        let ratio = masks::coverage(&mask);
        let rejection = self.check.judge(ratio, &self.config);

        debug!(
            check = self.check.name(),
            ratio,
            cutoff = self.check.cutoff(&self.config),
            rejected = rejection.is_some(),
            "ratio test"
        );

        let mut data = data
            .with_metadata(format!("{}_ratio", self.check.name()), MetadataValue::Float(ratio))
            .with_metadata(format!("{}_passed", self.check.name()), MetadataValue::Bool(rejection.is_none()));
        if let Some(rejection) = rejection {
            data = data.with_metadata("rejected_by", MetadataValue::String(self.check.name().to_string()));
            data.rejection = Some(rejection);
        }
        data.mask = Some(mask);

        Ok(data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
