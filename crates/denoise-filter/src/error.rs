//! Error types for denoise-filter

use thiserror::Error;

/// Errors that can occur during denoising
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error (dimension mismatch, bad coordinates)
    #[error("core error: {0}")]
    Core(#[from] denoise_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The normalization denominator at a pixel was zero or not finite
    #[error("degenerate filter weights at ({x}, {y}): weight sum {weight_sum}")]
    DegenerateWeights { x: u32, y: u32, weight_sum: f32 },

    /// An external denoising backend reported a failure
    #[error("{backend} backend failed: {message}")]
    Backend {
        /// Backend name
        backend: String,
        /// Message reported by the backend
        message: String,
    },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
