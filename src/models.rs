use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Simulated acquisition phase selecting a filter recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Arterial,
    Venous,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Arterial => "arterial",
            Phase::Venous => "venous",
        }
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    /// Parse after trimming whitespace and lowercasing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arterial" => Ok(Phase::Arterial),
            "venous" => Ok(Phase::Venous),
            _ => Err(CoreError::InvalidPhase(s.to_string())),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the Otsu threshold counts as the object of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Foreground is intensity <= threshold (dark objects on a light background)
    #[default]
    Dark,
    /// Foreground is intensity > threshold
    Bright,
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Polarity::Dark),
            "bright" => Ok(Polarity::Bright),
            other => Err(format!("unknown polarity '{}', expected dark or bright", other)),
        }
    }
}

/// Ordered outer boundary of one connected foreground region
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<(u32, u32)>,
}

impl Contour {
    pub fn new(points: Vec<(u32, u32)>) -> Self {
        Self { points }
    }

    /// Polygon area of the traced boundary (shoelace formula).
    ///
    /// This is not the pixel count: a filled 60x60 square traces to a 59x59
    /// polygon. Contours with fewer than three points enclose nothing.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area: i64 = 0;
        for i in 0..n {
            let (x0, y0) = self.points[i];
            let (x1, y1) = self.points[(i + 1) % n];
            twice_area += x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64;
        }

        twice_area.abs() as f64 / 2.0
    }

    /// Minimal axis-aligned rectangle containing every boundary point
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let (first_x, first_y) = *self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);

        for &(x, y) in &self.points[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }
}

/// Axis-aligned box in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Outcome of region detection on one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected: bool,
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

impl DetectionResult {
    /// Result reported when no significant region exists
    pub fn not_detected() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            bounding_box: None,
        }
    }

    pub fn found(area_ratio: f64, bbox: BoundingBox) -> Self {
        Self {
            detected: true,
            confidence: confidence_from_ratio(area_ratio),
            bounding_box: Some(bbox),
        }
    }
}

/// Clamp to [0, 1] and round to two decimals
pub fn confidence_from_ratio(area_ratio: f64) -> f64 {
    (area_ratio.clamp(0.0, 1.0) * 100.0).round() / 100.0
}
