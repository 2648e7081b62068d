use crate::pipeline::{PipelineData, PipelineStep, MetadataValue};
use crate::detection::{preprocessing, threshold};
use crate::models::Polarity;
use anyhow::Result;
use image::DynamicImage;
use tracing::debug;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let gray = preprocessing::to_grayscale(&data.image);
        Ok(data.with_image(DynamicImage::ImageLuma8(gray)))
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Fixed 5x5 Gaussian smoothing
pub struct SmoothingStep;

impl PipelineStep for SmoothingStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let gray = data.image.to_luma8();
        let smoothed = preprocessing::smooth_5x5(&gray);
        Ok(data.with_image(DynamicImage::ImageLuma8(smoothed)))
    }

    fn name(&self) -> &str {
        "Gaussian Smoothing"
    }
}

/// Global Otsu threshold into a 0/255 mask
pub struct OtsuThresholdStep {
    pub polarity: Polarity,
}

impl PipelineStep for OtsuThresholdStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let gray = data.image.to_luma8();
        let t = threshold::otsu_threshold(&threshold::histogram(&gray));
        let mask = threshold::binarize(&gray, t, self.polarity);

        debug!(threshold = ?t, polarity = ?self.polarity, "Otsu threshold computed");

        let data = data
            .with_image(DynamicImage::ImageLuma8(mask))
            .with_metadata("has_threshold", MetadataValue::Bool(t.is_some()));
        Ok(match t {
            Some(t) => data.with_metadata("otsu_threshold", MetadataValue::Int(t as i64)),
            None => data,
        })
    }

    fn name(&self) -> &str {
        "Otsu Threshold"
    }
}
