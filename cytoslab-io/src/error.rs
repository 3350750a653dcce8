//! I/O error types.

use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage error types.
///
/// Indices carried by the bounds variants are the caller's 1-based values.
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by the HDF5 library, with its error stack.
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] cytoslab_core::Error),

    /// Sample index beyond the fixed-capacity dataset.
    #[error("sample index {index} exceeds the sample capacity {capacity}")]
    SampleOutOfBounds { index: usize, capacity: usize },

    /// Channel index beyond the dataset's channel dimension.
    #[error("channel index {index} exceeds the channel capacity {capacity}")]
    ChannelOutOfBounds { index: usize, capacity: usize },

    /// More events than a fixed-capacity slot can hold.
    #[error("{events} events exceed the event capacity {capacity}")]
    EventCapacityExceeded { events: usize, capacity: usize },

    /// Write geometry disagrees with an existing per-sample dataset.
    #[error(
        "sample {sample} is stored as {stored_channels} channels x {stored_events} events, \
         write needs {channels} channels x {events} events"
    )]
    GeometryMismatch {
        sample: usize,
        stored_channels: usize,
        stored_events: usize,
        channels: usize,
        events: usize,
    },

    /// Deflate requested but the linked library lacks the filter.
    #[error("deflate filter is not available in the linked HDF5 library")]
    FilterUnavailable,

    /// Output buffer could not be allocated.
    #[error("cannot allocate a buffer of {elements} values")]
    Allocation { elements: usize },

    /// Container contents do not match either layout.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),
}
