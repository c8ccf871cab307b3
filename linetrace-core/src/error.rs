//! Error types for core line-art operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in sizing, generation, or scene handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Logical dimensions were zero or otherwise unusable.
    #[error("Invalid dimensions {width}x{height}: both sides must be positive")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Container area was empty, negative, or not finite.
    #[error("Invalid container {width}x{height}")]
    InvalidContainer {
        /// Available width in display pixels.
        width: f64,
        /// Available height in display pixels.
        height: f64,
    },

    /// Device pixel ratio was not a finite positive number.
    #[error("Invalid device pixel ratio: {0}")]
    InvalidDevicePixelRatio(f64),

    /// Line style parameters violated their constraints.
    #[error("Invalid line style parameters: {0}")]
    InvalidParams(String),

    /// A random source produced a value outside `[0, 1)`.
    #[error("Random source produced {0}, expected a finite value in [0, 1)")]
    InvalidRandom(f64),

    /// A computed coordinate or width was NaN or infinite.
    #[error("Non-finite geometry: {0}")]
    NonFiniteGeometry(String),

    /// A textual value (color, size, mode) could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Scene or settings serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
