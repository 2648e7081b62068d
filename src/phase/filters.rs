use image::{Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use crate::buffer::luma;

/// Mean luma of the whole image, rounded to the nearest integer
pub fn mean_luma(img: &RgbImage) -> f32 {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return 0.0;
    }

    let sum: u64 = img.pixels().map(|p| luma(p[0], p[1], p[2]) as u64).sum();
    (sum as f64 / total as f64).round() as f32
}

/// Scale every channel away from the image's mean luma by `factor`
pub fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luma(img);
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = clamp_u8(mean + (*c as f32 - mean) * factor);
        }
    }
    out
}

/// Gaussian blur applied independently per channel
pub fn gaussian_blur(img: &RgbImage, sigma: f32) -> RgbImage {
    gaussian_blur_f32(img, sigma)
}

/// Sharpen by adding back `percent`% of the difference to a blurred copy.
///
/// Channels whose difference is below `threshold` are left untouched so flat
/// regions do not pick up amplified noise.
pub fn unsharp_mask(img: &RgbImage, sigma: f32, percent: u32, threshold: u8) -> RgbImage {
    let blurred = gaussian_blur_f32(img, sigma);
    let amount = percent as f32 / 100.0;

    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let original = img.get_pixel(x, y);
        let soft = blurred.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let diff = original[c] as i32 - soft[c] as i32;
            out[c] = if diff.unsigned_abs() < threshold as u32 {
                original[c]
            } else {
                clamp_u8(original[c] as f32 + diff as f32 * amount)
            };
        }
        Rgb(out)
    })
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
