//! Renderer error types.

use linetrace_core::CoreError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering and export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error from the core engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A pixel buffer could not be allocated.
    ///
    /// Callers can retry with a lower resolution multiplier.
    #[error("Cannot allocate a {width}x{height} pixel buffer")]
    Allocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Resolution multiplier is not finite and positive.
    #[error("Invalid resolution multiplier: {0}")]
    InvalidResolution(f64),

    /// Image encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The scene contains geometry that cannot be painted.
    #[error("Scene rejected before painting: {0}")]
    InvalidScene(String),
}
