//! Multi-image analysis for the command line.
//!
//! Every input path yields exactly one result, in argument order, so output
//! lines always line up with the paths that produced them.

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::buffer;
use crate::detection::RegionDetector;
use crate::models::DetectionResult;
use crate::service;

/// Read and decode an image file
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let img = buffer::decode(&bytes)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    info!("Image loaded: {}x{}", img.width(), img.height());
    Ok(img)
}

/// Analyze every image on the blocking pool; results come back in input order
pub async fn analyze_paths(paths: Vec<PathBuf>, detector: &RegionDetector) -> Vec<Result<DetectionResult>> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let detector = detector.clone();
            tokio::task::spawn_blocking(move || -> Result<DetectionResult> {
                let img = load_image(&path)?;
                let result = detector.detect(&img)?;
                info!(detected = result.detected, "Analyzed {}", path.display());
                Ok(result)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Analysis task failed: {}", e)),
        };
        if let Err(e) = &result {
            error!("{:#}", e);
        }
        results.push(result);
    }
    results
}

/// One JSON output line: the detection result, or the error envelope
pub fn result_line(result: &Result<DetectionResult>) -> String {
    match result {
        Ok(detection) => match serde_json::to_string(detection) {
            Ok(line) => line,
            Err(e) => service::error_envelope(&e.to_string()).to_string(),
        },
        Err(e) => service::error_envelope(&format!("{:#}", e)).to_string(),
    }
}
