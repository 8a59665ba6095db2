pub mod classifier;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod remote;
pub mod screening;

pub use error::InvalidInputError;
pub use models::{PlausibilityReport, Rejection, Verdict};
pub use screening::{build_screening_pipeline, PlausibilityFilter};
pub use screening::checks::Check;
pub use screening::config::FilterConfig;
pub use pipeline::{
    Pipeline, PipelineData, PipelineStep, PipelineContext, MetadataValue, DebugConfig
};
pub use classifier::{DiseaseLabel, DiseaseModel, Diagnosis, GatedClassifier, Screening};
