//! Error types for the heatmap crates.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap rendering.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Construction Errors ===
    #[error("Raster surface is unsupported: {0}")]
    UnsupportedSurface(String),

    // === Rendering Errors ===
    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Encoding failed: {0}")]
    Encode(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl HeatmapError {
    /// Whether the error leaves the failing component unusable.
    ///
    /// Only construction-time failures are fatal; everything else is scoped
    /// to the single operation that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HeatmapError::UnsupportedSurface(_))
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::Config(format!("JSON error: {}", err))
    }
}
