use thiserror::Error;

/// Errors produced by the image pipelines.
///
/// Every variant is a deterministic function of the input, so callers report
/// them rather than retrying.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bytes are empty or not a recognizable image container
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Phase did not normalize to `arterial` or `venous`
    #[error("phase must be arterial or venous")]
    InvalidPhase(String),

    /// Decoded image has no pixels
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("failed to encode image: {0}")]
    Encode(String),
}
