//! Error types for offscreen surfaces and the bundled rasterizer

use thiserror::Error;

use crate::math::Rect;

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Errors raised by surfaces, bitmaps and drawing contexts
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The surface has no buffer (created empty or already disposed)
    #[error("surface has no buffer")]
    NoBuffer,

    /// Bitmaps need at least one pixel on each axis
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source rectangle with no area
    #[error("invalid source rectangle {0:?}")]
    InvalidRect(Rect),

    /// Font sizes must be finite and positive
    #[error("invalid font size {0}")]
    InvalidFontSize(f32),

    /// Raw pixel data does not match the requested dimensions
    #[error("pixel data has {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SurfaceError {
    fn from(err: serde_json::Error) -> Self {
        SurfaceError::Config(err.to_string())
    }
}
