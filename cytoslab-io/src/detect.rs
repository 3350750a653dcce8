//! Layout detection.
//!
//! No format tag is stored in a container. A file uses the fixed-capacity
//! layout exactly when [`FIXED_DATASET_NAME`] exists and is three-dimensional;
//! everything else is treated as the per-sample layout.

use crate::{Error, Result};
use cytoslab_core::{LayoutKind, FIXED_DATASET_NAME};
use hdf5::{Dataset, File};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Opens the fixed-capacity dataset if the file uses that layout.
///
/// A 2-D dataset under the canonical name is closed again and reported as `None`.
///
/// # Errors
/// Returns an error if the name exists but cannot be opened as a dataset.
pub fn open_fixed_dataset(file: &File) -> Result<Option<Dataset>> {
    if !file.link_exists(FIXED_DATASET_NAME) {
        return Ok(None);
    }
    let dataset = file.dataset(FIXED_DATASET_NAME)?;
    if dataset.ndim() == LayoutKind::FixedCapacity.rank() {
        Ok(Some(dataset))
    } else {
        Ok(None)
    }
}

/// Reports which layout an open container uses.
///
/// # Errors
/// Returns an error if probing the canonical dataset fails.
pub fn detect_layout(file: &File) -> Result<LayoutKind> {
    let layout = match open_fixed_dataset(file)? {
        Some(_) => LayoutKind::FixedCapacity,
        None => LayoutKind::PerSample,
    };
    log::debug!("{} uses {layout:?} layout", file.filename());
    Ok(layout)
}

/// Dimensions of the fixed-capacity dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FixedGeometry {
    pub sample_capacity: usize,
    pub channel_capacity: usize,
    pub event_capacity: usize,
}

impl FixedGeometry {
    /// Reads the geometry of an opened fixed-capacity dataset.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the dataset is not three-dimensional.
    pub fn of(dataset: &Dataset) -> Result<Self> {
        match dataset.shape().as_slice() {
            &[sample_capacity, channel_capacity, event_capacity] => Ok(Self {
                sample_capacity,
                channel_capacity,
                event_capacity,
            }),
            other => Err(Error::InvalidFormat(format!(
                "{FIXED_DATASET_NAME} must be 3-D (sample, channel, event), found shape {other:?}"
            ))),
        }
    }

    /// Checks a 0-based sample offset.
    ///
    /// # Errors
    /// Returns [`Error::SampleOutOfBounds`] with the 1-based index.
    pub fn check_sample(&self, sample: usize) -> Result<()> {
        if sample >= self.sample_capacity {
            return Err(Error::SampleOutOfBounds {
                index: sample + 1,
                capacity: self.sample_capacity,
            });
        }
        Ok(())
    }

    /// Checks 0-based channel offsets.
    ///
    /// # Errors
    /// Returns [`Error::ChannelOutOfBounds`] for the first offending channel.
    pub fn check_channels(&self, channels: &[usize]) -> Result<()> {
        check_channel_dim(channels, self.channel_capacity)
    }

    /// Checks an event count against the slot length.
    ///
    /// # Errors
    /// Returns [`Error::EventCapacityExceeded`] if `events` does not fit.
    pub fn check_events(&self, events: usize) -> Result<()> {
        if events > self.event_capacity {
            return Err(Error::EventCapacityExceeded {
                events,
                capacity: self.event_capacity,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_channel_dim(channels: &[usize], capacity: usize) -> Result<()> {
    match channels.iter().find(|&&ch| ch >= capacity) {
        Some(&ch) => Err(Error::ChannelOutOfBounds {
            index: ch + 1,
            capacity,
        }),
        None => Ok(()),
    }
}
