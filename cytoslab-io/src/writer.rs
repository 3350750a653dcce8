//! Slice writes.

use crate::container::{create_sample_dataset, sample_shape};
use crate::detect::{check_channel_dim, open_fixed_dataset, FixedGeometry};
use crate::registry::EventCountRegistry;
use crate::transfer::write_transfer;
use crate::{Error, Result};
use cytoslab_core::{
    channel_offsets, plan_transfers, sample_dataset_name, to_zero_based, CompressionConfig,
    EventMatrix, IndexKind, LayoutKind,
};
use hdf5::{Dataset, File};
use std::path::Path;

/// Writes the columns of `matrix` into channels of one sample.
///
/// `channels` and `sample` are 1-based; column `i` of `matrix` lands in
/// channel `channels[i]`. On a fixed-capacity container the sample's event
/// count is set to `matrix.n_events()` after every channel row is written.
/// On a per-sample container the sample's dataset is created on first write
/// using `compression`; later writes must use the same event count and stay
/// within its channel dimension. `compression` is ignored for existing datasets
/// and for the fixed-capacity layout.
///
/// # Errors
/// Returns an error if the indices or matrix shape are invalid, the sample or a
/// channel is out of bounds, the geometry conflicts with an existing sample
/// dataset, or HDF5 fails.
pub fn write_slice<P: AsRef<Path>>(
    path: P,
    matrix: &EventMatrix,
    channels: &[usize],
    sample: usize,
    compression: CompressionConfig,
) -> Result<()> {
    let path = path.as_ref();
    write_slice_impl(path, matrix, channels, sample, compression).inspect_err(|e| {
        log::error!(
            "write_slice failed for {} (sample {sample}, channels {channels:?}): {e}",
            path.display()
        );
    })
}

fn write_slice_impl(
    path: &Path,
    matrix: &EventMatrix,
    channels: &[usize],
    sample: usize,
    compression: CompressionConfig,
) -> Result<()> {
    if channels.is_empty() {
        return Err(
            cytoslab_core::Error::ShapeMismatch("no channels requested".to_string()).into(),
        );
    }
    if matrix.n_channels() != channels.len() {
        return Err(cytoslab_core::Error::ShapeMismatch(format!(
            "matrix has {} columns for {} channels",
            matrix.n_channels(),
            channels.len()
        ))
        .into());
    }
    let sample = to_zero_based(sample, IndexKind::Sample)?;
    let offsets = channel_offsets(channels)?;

    let file = File::open_rw(path)?;
    match open_fixed_dataset(&file)? {
        Some(dataset) => write_fixed(&dataset, matrix, sample, &offsets),
        None => write_per_sample(&file, matrix, sample, &offsets, compression),
    }
}

fn write_fixed(
    dataset: &Dataset,
    matrix: &EventMatrix,
    sample: usize,
    offsets: &[usize],
) -> Result<()> {
    let geometry = FixedGeometry::of(dataset)?;
    geometry.check_sample(sample)?;
    geometry.check_channels(offsets)?;
    geometry.check_events(matrix.n_events())?;
    let registry = EventCountRegistry::open(dataset)?;

    let plan = plan_transfers(LayoutKind::FixedCapacity, sample, offsets, matrix.n_events());
    log::debug!(
        "writing {} events x {} channels into fixed slot {sample}",
        matrix.n_events(),
        plan.len()
    );
    for transfer in &plan {
        write_transfer(dataset, transfer, matrix.values())?;
    }
    registry.set(sample, matrix.n_events())
}

fn write_per_sample(
    file: &File,
    matrix: &EventMatrix,
    sample: usize,
    offsets: &[usize],
    compression: CompressionConfig,
) -> Result<()> {
    let name = sample_dataset_name(sample);
    let events = matrix.n_events();
    let channels = offsets.iter().max().map_or(0, |&max| max + 1);

    let dataset = if file.link_exists(&name) {
        let dataset = file.dataset(&name)?;
        let (stored_channels, stored_events) = sample_shape(&dataset, sample)?;
        if stored_events != events || check_channel_dim(offsets, stored_channels).is_err() {
            return Err(Error::GeometryMismatch {
                sample: sample + 1,
                stored_channels,
                stored_events,
                channels,
                events,
            });
        }
        dataset
    } else {
        log::debug!("creating sample dataset {name} with {channels} channels x {events} events");
        create_sample_dataset(file, &name, channels, events, compression)?
    };

    let plan = plan_transfers(LayoutKind::PerSample, sample, offsets, events);
    for transfer in &plan {
        write_transfer(&dataset, transfer, matrix.values())?;
    }
    Ok(())
}
