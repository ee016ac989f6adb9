//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during compositing and encoding.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output raster could not be allocated (zero or oversized target).
    #[error("Failed to allocate {width}x{height} pixmap")]
    Pixmap {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Motif asset or uploaded image could not be loaded.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Encoding the composited image failed.
    #[error("Export failed: {0}")]
    Export(String),
}
