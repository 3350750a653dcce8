//! Slice reads.

use crate::container::sample_shape;
use crate::detect::{check_channel_dim, open_fixed_dataset, FixedGeometry};
use crate::registry::EventCountRegistry;
use crate::transfer::{allocate, read_transfer};
use crate::{Error, Result};
use cytoslab_core::{
    channel_offsets, plan_transfers, sample_dataset_name, to_zero_based, EventMatrix, IndexKind,
    LayoutKind,
};
use hdf5::{Dataset, File};
use std::path::Path;

/// Reads channels of one sample into an `events x channels` matrix.
///
/// `channels` and `sample` are 1-based. A per-sample container without a
/// dataset for `sample` yields a matrix with zero rows, as does a
/// fixed-capacity slot that was never written.
///
/// # Errors
/// Returns an error if an index is zero or out of bounds, the output buffer
/// cannot be allocated, or HDF5 fails.
pub fn read_slice<P: AsRef<Path>>(
    path: P,
    channels: &[usize],
    sample: usize,
) -> Result<EventMatrix> {
    let path = path.as_ref();
    read_slice_impl(path, channels, sample)
        .inspect_err(|e| log_read_failure(path, channels, sample, e))
}

/// Like [`read_slice`], attaching caller-supplied column labels.
///
/// # Errors
/// As [`read_slice`]; also fails if `labels.len() != channels.len()`.
pub fn read_slice_labeled<P: AsRef<Path>>(
    path: P,
    channels: &[usize],
    sample: usize,
    labels: Vec<String>,
) -> Result<EventMatrix> {
    let path = path.as_ref();
    read_slice_impl(path, channels, sample)
        .and_then(|matrix| matrix.with_labels(labels).map_err(Error::from))
        .inspect_err(|e| log_read_failure(path, channels, sample, e))
}

fn log_read_failure(path: &Path, channels: &[usize], sample: usize, e: &Error) {
    log::error!(
        "read_slice failed for {} (sample {sample}, channels {channels:?}): {e}",
        path.display()
    );
}

fn read_slice_impl(path: &Path, channels: &[usize], sample: usize) -> Result<EventMatrix> {
    let sample = to_zero_based(sample, IndexKind::Sample)?;
    let offsets = channel_offsets(channels)?;

    let file = File::open(path)?;
    if let Some(dataset) = open_fixed_dataset(&file)? {
        let geometry = FixedGeometry::of(&dataset)?;
        geometry.check_sample(sample)?;
        geometry.check_channels(&offsets)?;
        let events = EventCountRegistry::open(&dataset)?.get(sample)?;
        if events > geometry.event_capacity {
            return Err(Error::InvalidFormat(format!(
                "eventCount[{sample}] = {events} exceeds the event capacity {}",
                geometry.event_capacity
            )));
        }
        return read_rows(&dataset, LayoutKind::FixedCapacity, sample, &offsets, events);
    }

    let name = sample_dataset_name(sample);
    if !file.link_exists(&name) {
        log::debug!("sample {name} has no dataset, returning empty slice");
        return Ok(EventMatrix::empty(offsets.len()));
    }
    let dataset = file.dataset(&name)?;
    let (stored_channels, events) = sample_shape(&dataset, sample)?;
    check_channel_dim(&offsets, stored_channels)?;
    read_rows(&dataset, LayoutKind::PerSample, sample, &offsets, events)
}

fn read_rows(
    dataset: &Dataset,
    layout: LayoutKind,
    sample: usize,
    offsets: &[usize],
    events: usize,
) -> Result<EventMatrix> {
    let mut buffer = allocate(events, offsets.len())?;
    for transfer in plan_transfers(layout, sample, offsets, events) {
        read_transfer(dataset, &transfer, &mut buffer)?;
    }
    Ok(EventMatrix::from_channel_major(events, offsets.len(), buffer)?)
}
