//! Conversion from caller-facing 1-based indices to 0-based offsets.

use crate::{Error, Result};
use std::fmt;

/// Which axis an index addresses, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Sample,
    Channel,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => f.write_str("sample"),
            Self::Channel => f.write_str("channel"),
        }
    }
}

/// Converts a 1-based index to a 0-based offset.
///
/// # Errors
/// Returns [`Error::InvalidIndex`] when `one_based` is zero.
pub fn to_zero_based(one_based: usize, kind: IndexKind) -> Result<usize> {
    one_based
        .checked_sub(1)
        .ok_or(Error::InvalidIndex { kind, value: one_based })
}

/// Converts a list of 1-based channel indices, preserving order.
///
/// # Errors
/// Returns [`Error::InvalidIndex`] on the first zero index.
pub fn channel_offsets(channels: &[usize]) -> Result<Vec<usize>> {
    channels
        .iter()
        .map(|&ch| to_zero_based(ch, IndexKind::Channel))
        .collect()
}
