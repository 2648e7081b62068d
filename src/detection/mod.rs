pub mod preprocessing;
pub mod threshold;
pub mod contours;
pub mod steps;

use anyhow::Result;
use image::{DynamicImage, GrayImage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::buffer;
use crate::models::{Contour, DetectionResult, Polarity};
use crate::pipeline::Pipeline;
use steps::{GrayscaleStep, OtsuThresholdStep, SmoothingStep};

/// Minimum share of the frame the largest region must cover
pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.05;

/// Locates the single largest high-contrast region in an image
#[derive(Debug, Clone)]
pub struct RegionDetector {
    pub min_area_ratio: f64,
    pub polarity: Polarity,
    pub debug_dir: Option<PathBuf>,
}

impl RegionDetector {
    pub fn new() -> Self {
        Self {
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            polarity: Polarity::default(),
            debug_dir: None,
        }
    }

    pub fn with_min_area_ratio(mut self, ratio: f64) -> Self {
        self.min_area_ratio = ratio;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Save every intermediate stage under `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Grayscale, smoothing and thresholding stages producing the binary mask
    pub fn build_pipeline(&self) -> Result<Pipeline> {
        let pipeline = Pipeline::new()
            .add_step(Arc::new(GrayscaleStep))
            .add_step(Arc::new(SmoothingStep))
            .add_step(Arc::new(OtsuThresholdStep { polarity: self.polarity }));

        match &self.debug_dir {
            Some(dir) => pipeline.with_debug(dir.clone()),
            None => Ok(pipeline),
        }
    }

    /// Run the full detection pipeline on an image
    pub fn detect(&self, img: &DynamicImage) -> Result<DetectionResult> {
        buffer::ensure_nonempty(img)?;
        info!(width = img.width(), height = img.height(), "Detecting region");

        let mask = self.build_pipeline()?.run(img.clone())?;
        Ok(self.detect_in_mask(&mask.image.to_luma8()))
    }

    /// Select the largest external region of a binary mask and score it
    pub fn detect_in_mask(&self, mask: &GrayImage) -> DetectionResult {
        let all_contours = contours::find_external_contours(mask);
        debug!("Found {} contours", all_contours.len());

        let Some(largest) = contours::largest_contour(&all_contours) else {
            return DetectionResult::not_detected();
        };

        let image_area = mask.width() as f64 * mask.height() as f64;
        let area_ratio = largest.area() / image_area;
        debug!(area = largest.area(), area_ratio, "Largest contour selected");

        if area_ratio < self.min_area_ratio {
            debug!("Largest region below minimum area ratio {}", self.min_area_ratio);
            return DetectionResult::not_detected();
        }

        match largest.bounding_box() {
            Some(bbox) => DetectionResult::found(area_ratio, bbox),
            None => DetectionResult::not_detected(),
        }
    }

    /// Get all external contours of an image (for debugging)
    pub fn get_contours(&self, img: &DynamicImage) -> Result<Vec<Contour>> {
        buffer::ensure_nonempty(img)?;
        let mask = self.build_pipeline()?.run(img.clone())?;
        Ok(contours::find_external_contours(&mask.image.to_luma8()))
    }
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an uploaded image and run detection with default parameters
pub fn analyze_bytes(bytes: &[u8]) -> Result<DetectionResult> {
    let img = buffer::decode(bytes)?;
    RegionDetector::new().detect(&img)
}
