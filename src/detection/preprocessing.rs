use image::{DynamicImage, GrayImage};
use imageproc::filter::separable_filter_equal;

use crate::buffer;

/// 5-tap binomial Gaussian, applied once per axis
const KERNEL_5: [f32; 5] = [1. / 16., 4. / 16., 6. / 16., 4. / 16., 1. / 16.];

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    buffer::to_grayscale(&buffer::to_rgb(img))
}

/// Smooth with the fixed 5x5 Gaussian kernel
pub fn smooth_5x5(img: &GrayImage) -> GrayImage {
    separable_filter_equal(img, &KERNEL_5)
}
