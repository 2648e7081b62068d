pub mod filters;
pub mod steps;

use anyhow::Result;
use image::{DynamicImage, RgbImage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::buffer;
use crate::models::Phase;
use crate::pipeline::Pipeline;
use steps::{ContrastStep, GaussianBlurStep, RgbStep, UnsharpMaskStep};

/// Contrast factor of the arterial look
pub const ARTERIAL_CONTRAST: f32 = 1.6;
/// Unsharp mask blur radius of the arterial look
pub const ARTERIAL_SHARPEN_RADIUS: f32 = 2.0;
pub const ARTERIAL_SHARPEN_PERCENT: u32 = 120;
pub const ARTERIAL_SHARPEN_THRESHOLD: u8 = 3;
/// Blur radius of the venous look
pub const VENOUS_BLUR_RADIUS: f32 = 2.0;

/// Build the filter recipe for a phase
pub fn build_phase_pipeline(phase: Phase) -> Pipeline {
    let pipeline = Pipeline::new().add_step(Arc::new(RgbStep));

    match phase {
        Phase::Arterial => pipeline
            .add_step(Arc::new(ContrastStep { factor: ARTERIAL_CONTRAST }))
            .add_step(Arc::new(UnsharpMaskStep {
                sigma: ARTERIAL_SHARPEN_RADIUS,
                percent: ARTERIAL_SHARPEN_PERCENT,
                threshold: ARTERIAL_SHARPEN_THRESHOLD,
            })),
        Phase::Venous => pipeline
            .add_step(Arc::new(GaussianBlurStep { sigma: VENOUS_BLUR_RADIUS })),
    }
}

/// Applies a phase recipe to whole images
pub struct PhaseTransform {
    pub phase: Phase,
    pub debug_dir: Option<PathBuf>,
}

impl PhaseTransform {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            debug_dir: None,
        }
    }

    /// Save every intermediate stage under `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Run the recipe, producing a new RGB image
    pub fn apply(&self, img: &DynamicImage) -> Result<RgbImage> {
        buffer::ensure_nonempty(img)?;

        let mut pipeline = build_phase_pipeline(self.phase);
        if let Some(dir) = &self.debug_dir {
            pipeline = pipeline.with_debug(dir.clone())?;
        }

        info!(phase = %self.phase, width = img.width(), height = img.height(), "Applying phase transform");
        let output = pipeline.run(img.clone())?;
        Ok(output.image.to_rgb8())
    }

    /// Run the recipe and re-encode the result as PNG
    pub fn apply_to_png(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = self.apply(img)?;
        Ok(buffer::encode_png(&DynamicImage::ImageRgb8(rgb))?)
    }
}

/// Decode, transform and re-encode an uploaded image.
///
/// The phase is validated before any decoding happens.
pub fn transform_bytes(bytes: &[u8], phase: &str) -> Result<Vec<u8>> {
    let phase: Phase = phase.parse()?;
    let img = buffer::decode(bytes)?;
    PhaseTransform::new(phase).apply_to_png(&img)
}
