//! Error types for placement operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Item not found in the placement store.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Unknown motif identifier.
    #[error("Unknown motif: {0}")]
    UnknownMotif(String),

    /// Frame data does not match its declared dimensions.
    #[error("Invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrame {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}
