//! Hyperslab addressing for per-channel transfers.
//!
//! A slice request (one sample, a list of channels, an event count) becomes one
//! [`ChannelTransfer`] per requested channel. Each transfer pairs the region in the
//! on-disk dataset with the row of the channel-major memory buffer. Channels are
//! never batched, so non-contiguous channel sets need no special handling.
//!
//! All offsets here are 0-based.

use crate::LayoutKind;
use std::ops::Range;

/// Region of the on-disk dataset covering one channel row of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRegion {
    /// `(sample, channel, event)` dataset; the sample coordinate is fixed.
    Fixed {
        sample: usize,
        channel: usize,
        events: usize,
    },
    /// `(channel, event)` dataset owned by a single sample.
    PerSample { channel: usize, events: usize },
}

impl FileRegion {
    /// Start coordinate per dataset dimension.
    #[must_use]
    pub fn offset(&self) -> Vec<usize> {
        match *self {
            Self::Fixed {
                sample, channel, ..
            } => vec![sample, channel, 0],
            Self::PerSample { channel, .. } => vec![channel, 0],
        }
    }

    /// Extent per dataset dimension.
    #[must_use]
    pub fn count(&self) -> Vec<usize> {
        match *self {
            Self::Fixed { events, .. } => vec![1, 1, events],
            Self::PerSample { events, .. } => vec![1, events],
        }
    }

    #[must_use]
    pub fn channel(&self) -> usize {
        match *self {
            Self::Fixed { channel, .. } | Self::PerSample { channel, .. } => channel,
        }
    }

    #[must_use]
    pub fn events(&self) -> usize {
        match *self {
            Self::Fixed { events, .. } | Self::PerSample { events, .. } => events,
        }
    }

    /// Event coordinates covered by this region.
    #[must_use]
    pub fn event_range(&self) -> Range<usize> {
        0..self.events()
    }
}

/// Row of a tightly packed `(channels, events)` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub row: usize,
    pub events: usize,
}

impl MemoryRegion {
    #[must_use]
    pub fn offset(&self) -> [usize; 2] {
        [self.row, 0]
    }

    #[must_use]
    pub fn count(&self) -> [usize; 2] {
        [1, self.events]
    }

    /// Flat element range of this row in the channel-major buffer.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        let start = self.row * self.events;
        start..start + self.events
    }
}

/// One hyperslab transfer between file and memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTransfer {
    pub file: FileRegion,
    pub memory: MemoryRegion,
}

/// Plans one transfer per channel, in request order.
///
/// `sample` is ignored for [`LayoutKind::PerSample`] since each sample owns its dataset.
#[must_use]
pub fn plan_transfers(
    layout: LayoutKind,
    sample: usize,
    channels: &[usize],
    events: usize,
) -> Vec<ChannelTransfer> {
    channels
        .iter()
        .enumerate()
        .map(|(row, &channel)| {
            let file = match layout {
                LayoutKind::FixedCapacity => FileRegion::Fixed {
                    sample,
                    channel,
                    events,
                },
                LayoutKind::PerSample => FileRegion::PerSample { channel, events },
            };
            ChannelTransfer {
                file,
                memory: MemoryRegion { row, events },
            }
        })
        .collect()
}
