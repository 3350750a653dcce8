//! Per-sample event counts of the fixed-capacity layout.
//!
//! Counts live in one `u32` array attribute on the fixed-capacity dataset. Every
//! update rewrites the whole array, once per slice write and after all channel
//! rows have been written. A crash between the two leaves data and count out of
//! step; single-writer access is assumed.

use crate::{Error, Result};
use cytoslab_core::EVENT_COUNT_ATTR;
use hdf5::{Attribute, Dataset};
use ndarray::ArrayView1;

/// Handle to the `eventCount` attribute.
pub struct EventCountRegistry {
    attr: Attribute,
    capacity: usize,
}

impl EventCountRegistry {
    /// Creates the attribute with every slot set to zero.
    ///
    /// # Errors
    /// Returns an error if the attribute cannot be created or written.
    pub fn create(dataset: &Dataset, capacity: usize) -> Result<Self> {
        let attr = dataset
            .new_attr::<u32>()
            .shape((capacity,))
            .create(EVENT_COUNT_ATTR)?;
        let zeros = vec![0_u32; capacity];
        attr.write(ArrayView1::from(zeros.as_slice()))?;
        Ok(Self { attr, capacity })
    }

    /// Opens the attribute on an existing fixed-capacity dataset.
    ///
    /// # Errors
    /// Returns an error if the attribute is missing or not one-dimensional.
    pub fn open(dataset: &Dataset) -> Result<Self> {
        let attr = dataset.attr(EVENT_COUNT_ATTR)?;
        let capacity = match attr.shape().as_slice() {
            &[len] => len,
            other => {
                return Err(Error::InvalidFormat(format!(
                    "{EVENT_COUNT_ATTR} must be 1-D, found shape {other:?}"
                )))
            }
        };
        Ok(Self { attr, capacity })
    }

    /// Number of sample slots tracked.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reads all counts.
    ///
    /// # Errors
    /// Returns an error if the attribute cannot be read.
    pub fn counts(&self) -> Result<Vec<u32>> {
        let counts = self.attr.read_raw::<u32>()?;
        if counts.len() != self.capacity {
            return Err(Error::InvalidFormat(format!(
                "{EVENT_COUNT_ATTR} holds {} values, expected {}",
                counts.len(),
                self.capacity
            )));
        }
        Ok(counts)
    }

    /// Event count of a 0-based sample slot.
    ///
    /// # Errors
    /// Returns [`Error::SampleOutOfBounds`] for a slot past the capacity.
    pub fn get(&self, sample: usize) -> Result<usize> {
        self.check_slot(sample)?;
        let counts = self.counts()?;
        Ok(counts[sample] as usize)
    }

    /// Records `count` events for a 0-based sample slot.
    ///
    /// # Errors
    /// Returns an error if the slot is out of range, the count exceeds `u32`,
    /// or the attribute cannot be rewritten.
    pub fn set(&self, sample: usize, count: usize) -> Result<()> {
        self.check_slot(sample)?;
        let count = u32::try_from(count).map_err(|_| {
            Error::InvalidFormat(format!("event count {count} exceeds u32 range"))
        })?;
        let mut counts = self.counts()?;
        counts[sample] = count;
        self.attr.write(ArrayView1::from(counts.as_slice()))?;
        log::debug!("eventCount[{sample}] = {count}");
        Ok(())
    }

    fn check_slot(&self, sample: usize) -> Result<()> {
        if sample >= self.capacity {
            return Err(Error::SampleOutOfBounds {
                index: sample + 1,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
