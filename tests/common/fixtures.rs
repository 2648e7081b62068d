use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A `size`x`size` canvas with a centered `side`x`side` square
pub fn centered_square(size: u32, side: u32, square: Rgb<u8>, background: Rgb<u8>) -> RgbImage {
    let offset = (size - side) / 2;
    ImageBuffer::from_fn(size, size, |x, y| {
        let inside = (offset..offset + side).contains(&x) && (offset..offset + side).contains(&y);
        if inside { square } else { background }
    })
}

/// Black square centered on a white 100x100 canvas
pub fn black_square_on_white(side: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(centered_square(100, side, BLACK, WHITE))
}

pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, color))
}

/// Horizontal gray ramp between `low` and `high`
pub fn gradient(width: u32, height: u32, low: u8, high: u8) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, _| {
        let span = (high - low) as u32;
        let v = low as u32 + x * span / (width - 1).max(1);
        Rgb([v as u8, v as u8, v as u8])
    })
}

/// Deterministic per-pixel noise in [64, 191]
pub fn noise(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x2545_f491;
    ImageBuffer::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            64 + (state >> 25) as u8
        };
        Rgb([next(), next(), next()])
    })
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    phasesim::buffer::encode_png(img).expect("Failed to encode test image")
}

/// Population variance of one channel over a rectangle
pub fn channel_variance(img: &RgbImage, channel: usize, x0: u32, y0: u32, w: u32, h: u32) -> f64 {
    let values: Vec<f64> = (y0..y0 + h)
        .flat_map(|y| (x0..x0 + w).map(move |x| (x, y)))
        .map(|(x, y)| img.get_pixel(x, y)[channel] as f64)
        .collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Standard deviation of BT.601 luma over the whole image
pub fn luma_std(img: &RgbImage) -> f64 {
    let values: Vec<f64> = img
        .pixels()
        .map(|p| phasesim::buffer::luma(p[0], p[1], p[2]) as f64)
        .collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
