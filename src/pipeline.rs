use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use tracing::{debug, info};

/// Data that flows through the pipeline: the current stage image plus
/// scalar facts recorded by earlier steps
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (color, grayscale or binary mask)
    pub image: DynamicImage,

    /// Metadata recorded by steps (e.g., "otsu_threshold")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
}

impl PipelineData {
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            metadata: HashMap::new(),
        }
    }

    /// Replace the image, keeping metadata
    pub fn with_image(self, image: DynamicImage) -> Self {
        Self {
            image,
            metadata: self.metadata,
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

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Trait that all pipeline steps must implement.
///
/// Each step consumes the previous stage and produces a new one. Steps hold
/// no per-invocation state.
pub trait PipelineStep: Send + Sync {
    fn process(&self, data: PipelineData) -> Result<PipelineData>;

    /// Human-readable name for this step (used in logs and debug directory names)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    /// Root directory for debug outputs
    debug_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory.
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

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<PipelineData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<PipelineData> {
        self.save_debug_image(&input, "00_input")?;

        let mut data = PipelineData::from_image(input);

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!(step = step.name(), index = step_idx + 1, "Running step");
            data = step.process(data)?;

            let step_dir_name = format!("{:02}_{}", step_idx + 1,
                step.name().to_lowercase().replace(' ', "_"));
            self.save_debug_image(&data.image, &step_dir_name)?;
        }

        Ok(data)
    }

    /// Save a stage image as `<debug_dir>/<step_dir>/01.png` in debug mode
    fn save_debug_image(&self, image: &DynamicImage, step_dir_name: &str) -> Result<()> {
        let Some(debug_dir) = &self.debug_dir else {
            return Ok(());
        };

        let step_dir = debug_dir.join(step_dir_name);
        std::fs::create_dir_all(&step_dir)?;
        let output_path = step_dir.join("01.png");
        save_png(image, &output_path)?;

        info!("Debug: saved {}/01.png", step_dir_name);
        Ok(())
    }
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))
}
