use image::{GrayImage, Luma};

use crate::models::Polarity;

/// Mask value for foreground pixels
pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// 256-bin intensity histogram
pub fn histogram(gray: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for pixel in gray.pixels() {
        hist[pixel[0] as usize] += 1;
    }
    hist
}

/// Compute Otsu's threshold.
///
/// Pixels `<= t` form the lower class. Returns the lowest `t` maximizing
/// `w0 * w1 * (m0 - m1)^2`, or `None` when no split separates anything
/// (fewer than two occupied bins).
pub fn otsu_threshold(hist: &[u64; 256]) -> Option<u8> {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return None;
    }

    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_lower = 0.0f64;
    let mut weight_lower = 0u64;
    let mut best: Option<(u8, f64)> = None;

    for (t, &count) in hist.iter().enumerate() {
        weight_lower += count;
        sum_lower += t as f64 * count as f64;
        if weight_lower == 0 {
            continue;
        }
        let weight_upper = total - weight_lower;
        if weight_upper == 0 {
            break;
        }

        let mean_lower = sum_lower / weight_lower as f64;
        let mean_upper = (sum_total - sum_lower) / weight_upper as f64;
        let between = weight_lower as f64
            * weight_upper as f64
            * (mean_lower - mean_upper).powi(2);

        // strict comparison keeps the lowest t on ties
        if between > 0.0 && best.is_none_or(|(_, v)| between > v) {
            best = Some((t as u8, between));
        }
    }

    best.map(|(t, _)| t)
}

/// Binary mask of `gray` against `threshold`; `None` yields an all-background mask
pub fn binarize(gray: &GrayImage, threshold: Option<u8>, polarity: Polarity) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        let is_foreground = match (threshold, polarity) {
            (None, _) => false,
            (Some(t), Polarity::Bright) => v > t,
            (Some(t), Polarity::Dark) => v <= t,
        };
        Luma([if is_foreground { FOREGROUND } else { BACKGROUND }])
    })
}
