//! Physical layout kinds and on-disk naming conventions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the single 3-D dataset used by the fixed-capacity layout.
///
/// Its presence (with three dimensions) is the only marker of that layout.
pub const FIXED_DATASET_NAME: &str = "exprsMat";

/// Attribute on [`FIXED_DATASET_NAME`] holding one `u32` event count per sample slot.
pub const EVENT_COUNT_ATTR: &str = "eventCount";

/// Physical layout of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LayoutKind {
    /// One pre-sized `(sample, channel, event)` dataset for every sample.
    FixedCapacity,
    /// One lazily created `(channel, event)` dataset per sample.
    PerSample,
}

impl LayoutKind {
    /// Rank of the datasets holding event values.
    #[must_use]
    pub fn rank(self) -> usize {
        match self {
            Self::FixedCapacity => 3,
            Self::PerSample => 2,
        }
    }
}

/// Library format compatibility used when the container file is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VersionMode {
    /// Oldest object format, readable by the broadest range of tooling.
    Earliest,
    /// Newest object format supported by the linked library.
    #[default]
    Latest,
}

/// Dataset name for a 0-based sample offset in the per-sample layout.
#[must_use]
pub fn sample_dataset_name(sample: usize) -> String {
    sample.to_string()
}
