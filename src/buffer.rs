use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use std::io::Cursor;
use tracing::debug;

use crate::error::CoreError;

/// Decode a compressed image container (PNG, JPEG, ...) from memory
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Decode("empty image data".to_string()));
    }

    let img = image::load_from_memory(bytes).map_err(|e| CoreError::Decode(e.to_string()))?;
    ensure_nonempty(&img)?;

    debug!(width = img.width(), height = img.height(), "Decoded image");
    Ok(img)
}

/// Reject images with zero width or height
pub fn ensure_nonempty(img: &DynamicImage) -> Result<(), CoreError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(CoreError::InvalidImage(format!(
            "image has zero area ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(())
}

/// Normalize any channel layout to 8-bit RGB
pub fn to_rgb(img: &DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        other => other.to_rgb8(),
    }
}

/// Luma of one RGB sample using BT.601 weights, rounded to nearest
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
    y.min(255) as u8
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

/// Losslessly encode as PNG
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CoreError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| CoreError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
