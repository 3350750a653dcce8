//! Chunking and deflate settings applied at dataset creation.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest deflate level accepted.
pub const MAX_DEFLATE_LEVEL: u8 = 9;

/// Deflate level for new datasets. Level 0 disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct CompressionConfig {
    level: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl CompressionConfig {
    /// Creates a configuration for the given deflate level.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCompressionLevel`] if `level > 9`. Levels are never clamped.
    pub fn new(level: u32) -> Result<Self> {
        match u8::try_from(level) {
            Ok(level) if level <= MAX_DEFLATE_LEVEL => Ok(Self { level }),
            _ => Err(Error::InvalidCompressionLevel(level)),
        }
    }

    /// No compression.
    #[must_use]
    pub fn none() -> Self {
        Self { level: 0 }
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Returns true if a deflate filter should be attached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.level > 0
    }

    /// Chunk shape for the fixed-capacity dataset: one channel row of one sample.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] for a zero event capacity.
    pub fn fixed_chunk(event_capacity: usize) -> Result<[usize; 3]> {
        if event_capacity == 0 {
            return Err(Error::InvalidGeometry(
                "event capacity must be non-zero".to_string(),
            ));
        }
        Ok([1, 1, event_capacity])
    }

    /// Chunk shape for a per-sample dataset: one channel row.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGeometry`] when `n_events` is zero.
    pub fn per_sample_chunk(n_events: usize) -> Result<[usize; 2]> {
        if n_events == 0 {
            return Err(Error::InvalidGeometry(
                "cannot create a sample dataset with zero events".to_string(),
            ));
        }
        Ok([1, n_events])
    }
}

impl TryFrom<u32> for CompressionConfig {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

impl From<CompressionConfig> for u32 {
    fn from(config: CompressionConfig) -> Self {
        u32::from(config.level)
    }
}
