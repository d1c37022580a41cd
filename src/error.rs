//! Error types for colframe operations.

use arrow::error::ArrowError;
use thiserror::Error;

/// Result type alias using [`FrameError`].
pub type Result<T> = std::result::Result<T, FrameError>;

/// Error types for data frame, vector and group operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Malformed selector or mapping, unknown column, size mismatch, or an
    /// invalid grouping request on a data frame.
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// Unsupported operand, unknown function, or failed coercion on a vector.
    #[error("Vector argument error: {0}")]
    VectorArgumentError(String),

    /// A value cannot be represented in the target element type.
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// A compute kernel failed (integer overflow and similar).
    #[error("Compute error: {0}")]
    ComputeError(String),

    /// Error surfaced by the Arrow substrate.
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

impl FrameError {
    /// Shorthand for a data frame scoped [`FrameError::ArgumentError`].
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        FrameError::ArgumentError(message.into())
    }

    /// Shorthand for a vector scoped [`FrameError::VectorArgumentError`].
    pub(crate) fn vector_argument(message: impl Into<String>) -> Self {
        FrameError::VectorArgumentError(message.into())
    }

    /// Shorthand for [`FrameError::TypeError`].
    pub(crate) fn type_error(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        FrameError::TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns true for either argument error scope.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FrameError::ArgumentError(_) | FrameError::VectorArgumentError(_)
        )
    }
}
