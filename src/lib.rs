pub mod batch;
pub mod buffer;
pub mod detection;
pub mod error;
pub mod models;
pub mod phase;
pub mod pipeline;
pub mod service;

pub use detection::{RegionDetector, analyze_bytes};
pub use error::CoreError;
pub use models::{BoundingBox, Contour, DetectionResult, Phase, Polarity};
pub use phase::{PhaseTransform, transform_bytes};
pub use pipeline::{MetadataValue, Pipeline, PipelineData, PipelineStep};
