use crate::pipeline::{PipelineData, PipelineStep};
use crate::phase::filters;
use crate::buffer;
use anyhow::Result;
use image::DynamicImage;

/// Normalize the input to 8-bit RGB
pub struct RgbStep;

impl PipelineStep for RgbStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let rgb = buffer::to_rgb(&data.image);
        Ok(data.with_image(DynamicImage::ImageRgb8(rgb)))
    }

    fn name(&self) -> &str {
        "RGB Conversion"
    }
}

/// Scale contrast around the mean luma
pub struct ContrastStep {
    pub factor: f32,
}

impl PipelineStep for ContrastStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let rgb = data.image.to_rgb8();
        let adjusted = filters::adjust_contrast(&rgb, self.factor);
        Ok(data.with_image(DynamicImage::ImageRgb8(adjusted)))
    }

    fn name(&self) -> &str {
        "Contrast"
    }
}

/// Unsharp mask sharpening
pub struct UnsharpMaskStep {
    pub sigma: f32,
    pub percent: u32,
    pub threshold: u8,
}

impl PipelineStep for UnsharpMaskStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let rgb = data.image.to_rgb8();
        let sharpened = filters::unsharp_mask(&rgb, self.sigma, self.percent, self.threshold);
        Ok(data.with_image(DynamicImage::ImageRgb8(sharpened)))
    }

    fn name(&self) -> &str {
        "Unsharp Mask"
    }
}

/// Per-channel Gaussian blur
pub struct GaussianBlurStep {
    pub sigma: f32,
}

impl PipelineStep for GaussianBlurStep {
    fn process(&self, data: PipelineData) -> Result<PipelineData> {
        let rgb = data.image.to_rgb8();
        let blurred = filters::gaussian_blur(&rgb, self.sigma);
        Ok(data.with_image(DynamicImage::ImageRgb8(blurred)))
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}
