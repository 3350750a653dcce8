//! Executes planned hyperslab transfers against an HDF5 dataset.

use crate::{Error, Result};
use cytoslab_core::{ChannelTransfer, FileRegion};
use hdf5::Dataset;
use ndarray::{s, Array1, ArrayView1};

/// Writes one channel row from a channel-major buffer into the dataset.
pub(crate) fn write_transfer(
    dataset: &Dataset,
    transfer: &ChannelTransfer,
    buffer: &[f64],
) -> Result<()> {
    let values = buffer
        .get(transfer.memory.range())
        .ok_or_else(|| buffer_too_short(transfer, buffer.len()))?;
    let values = ArrayView1::from(values);
    if values.is_empty() {
        return Ok(());
    }
    match transfer.file {
        FileRegion::Fixed {
            sample,
            channel,
            events,
        } => dataset.write_slice(values, s![sample, channel, 0..events])?,
        FileRegion::PerSample { channel, events } => {
            dataset.write_slice(values, s![channel, 0..events])?;
        }
    }
    Ok(())
}

/// Reads one channel row from the dataset into a channel-major buffer.
pub(crate) fn read_transfer(
    dataset: &Dataset,
    transfer: &ChannelTransfer,
    buffer: &mut [f64],
) -> Result<()> {
    let len = buffer.len();
    let target = buffer
        .get_mut(transfer.memory.range())
        .ok_or_else(|| buffer_too_short(transfer, len))?;
    if target.is_empty() {
        return Ok(());
    }
    let column: Array1<f64> = match transfer.file {
        FileRegion::Fixed {
            sample,
            channel,
            events,
        } => dataset.read_slice_1d(s![sample, channel, 0..events])?,
        FileRegion::PerSample { channel, events } => {
            dataset.read_slice_1d(s![channel, 0..events])?
        }
    };
    if column.len() != target.len() {
        return Err(Error::InvalidFormat(format!(
            "channel {} returned {} values, expected {}",
            transfer.file.channel() + 1,
            column.len(),
            target.len()
        )));
    }
    for (dst, src) in target.iter_mut().zip(column.iter()) {
        *dst = *src;
    }
    Ok(())
}

fn buffer_too_short(transfer: &ChannelTransfer, len: usize) -> Error {
    Error::InvalidFormat(format!(
        "buffer of {len} values has no row {} for {} events",
        transfer.memory.row, transfer.memory.events
    ))
}

/// Allocates a zeroed output buffer, reporting failure instead of aborting.
pub(crate) fn allocate(events: usize, channels: usize) -> Result<Vec<f64>> {
    let elements = events
        .checked_mul(channels)
        .ok_or(Error::Allocation { elements: usize::MAX })?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(elements)
        .map_err(|_| Error::Allocation { elements })?;
    buffer.resize(elements, 0.0);
    Ok(buffer)
}
