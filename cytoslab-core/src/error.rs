//! Error types for cytoslab-core.

use crate::index::IndexKind;
use thiserror::Error;

/// Result type alias for cytoslab core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cytoslab operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A 1-based index was zero.
    #[error("{kind} index must be 1-based, got {value}")]
    InvalidIndex { kind: IndexKind, value: usize },

    /// Deflate level outside 0..=9.
    #[error("compression level {0} out of range 0..=9")]
    InvalidCompressionLevel(u32),

    /// Container or dataset geometry that cannot be stored.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Matrix dimensions disagree with the request.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}
