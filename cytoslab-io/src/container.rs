//! Container creation and inspection.

use crate::detect::{open_fixed_dataset, FixedGeometry};
use crate::registry::EventCountRegistry;
use crate::{Error, Result};
use cytoslab_core::{CompressionConfig, LayoutKind, VersionMode, FIXED_DATASET_NAME};
use hdf5::{Dataset, File, Group};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [`create_container`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerOptions {
    /// Events per sample slot (fixed-capacity layout only).
    pub event_capacity: usize,
    /// Channels per sample slot (fixed-capacity layout only).
    pub channel_capacity: usize,
    /// Number of sample slots (fixed-capacity layout only).
    pub sample_capacity: usize,
    pub layout: LayoutKind,
    pub compression: CompressionConfig,
    pub version: VersionMode,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            event_capacity: 0,
            channel_capacity: 0,
            sample_capacity: 0,
            layout: LayoutKind::PerSample,
            compression: CompressionConfig::default(),
            version: VersionMode::Latest,
        }
    }
}

impl ContainerOptions {
    /// Options for a fixed-capacity container of the given dimensions.
    #[must_use]
    pub fn fixed(event_capacity: usize, channel_capacity: usize, sample_capacity: usize) -> Self {
        Self {
            event_capacity,
            channel_capacity,
            sample_capacity,
            layout: LayoutKind::FixedCapacity,
            ..Self::default()
        }
    }

    /// Options for an initially empty per-sample container.
    #[must_use]
    pub fn per_sample() -> Self {
        Self::default()
    }

    /// Sets the deflate configuration.
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the format compatibility mode.
    #[must_use]
    pub fn with_version(mut self, version: VersionMode) -> Self {
        self.version = version;
        self
    }
}

/// Creates (or truncates) a container file with the requested layout.
///
/// # Errors
/// Returns an error if a fixed-capacity dimension is zero, deflate is
/// unavailable, or HDF5 fails. A partially written file is not removed.
pub fn create_container<P: AsRef<Path>>(path: P, options: &ContainerOptions) -> Result<()> {
    let path = path.as_ref();
    create_container_impl(path, options).inspect_err(|e| {
        log::error!("create_container failed for {}: {e}", path.display());
    })
}

fn create_container_impl(path: &Path, options: &ContainerOptions) -> Result<()> {
    let file = match options.version {
        VersionMode::Earliest => File::with_options()
            .with_fapl(|p| p.libver_earliest())
            .create(path)?,
        VersionMode::Latest => File::with_options()
            .with_fapl(|p| p.libver_latest())
            .create(path)?,
    };

    match options.layout {
        LayoutKind::FixedCapacity => {
            let dataset = create_fixed_dataset(&file, options)?;
            EventCountRegistry::create(&dataset, options.sample_capacity)?;
            log::debug!(
                "created {} with {} samples x {} channels x {} events, deflate {}",
                path.display(),
                options.sample_capacity,
                options.channel_capacity,
                options.event_capacity,
                options.compression.level()
            );
        }
        LayoutKind::PerSample => {
            log::debug!("created empty per-sample container {}", path.display());
        }
    }
    Ok(())
}

fn create_fixed_dataset(file: &File, options: &ContainerOptions) -> Result<Dataset> {
    if options.sample_capacity == 0 || options.channel_capacity == 0 {
        return Err(cytoslab_core::Error::InvalidGeometry(
            "sample and channel capacities must be non-zero".to_string(),
        )
        .into());
    }
    let chunk = CompressionConfig::fixed_chunk(options.event_capacity)?;
    ensure_filter(options.compression)?;

    let mut builder = file.new_dataset::<f64>().shape((
        options.sample_capacity,
        options.channel_capacity,
        options.event_capacity,
    ));
    builder = builder.chunk(chunk);
    if options.compression.is_enabled() {
        builder = builder.deflate(options.compression.level());
    }
    Ok(builder.create(FIXED_DATASET_NAME)?)
}

/// Creates a `(channels, events)` dataset for one sample, chunked per channel row.
pub(crate) fn create_sample_dataset(
    group: &Group,
    name: &str,
    channels: usize,
    events: usize,
    compression: CompressionConfig,
) -> Result<Dataset> {
    let chunk = CompressionConfig::per_sample_chunk(events)?;
    ensure_filter(compression)?;

    let mut builder = group.new_dataset::<f64>().shape((channels, events));
    builder = builder.chunk(chunk);
    if compression.is_enabled() {
        builder = builder.deflate(compression.level());
    }
    Ok(builder.create(name)?)
}

fn ensure_filter(compression: CompressionConfig) -> Result<()> {
    if compression.is_enabled() && !hdf5::filters::deflate_available() {
        return Err(Error::FilterUnavailable);
    }
    Ok(())
}

/// Shape of one per-sample dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SampleSummary {
    /// 1-based sample index.
    pub sample: usize,
    pub channels: usize,
    pub events: usize,
}

/// Layout and occupancy of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "layout", rename_all = "snake_case"))]
pub enum ContainerSummary {
    FixedCapacity {
        geometry: FixedGeometry,
        event_counts: Vec<u32>,
    },
    PerSample {
        samples: Vec<SampleSummary>,
    },
}

impl ContainerSummary {
    #[must_use]
    pub fn layout(&self) -> LayoutKind {
        match self {
            Self::FixedCapacity { .. } => LayoutKind::FixedCapacity,
            Self::PerSample { .. } => LayoutKind::PerSample,
        }
    }
}

/// Describes an existing container without modifying it.
///
/// # Errors
/// Returns an error if the file cannot be opened or its datasets are malformed.
pub fn inspect_container<P: AsRef<Path>>(path: P) -> Result<ContainerSummary> {
    let path = path.as_ref();
    inspect_container_impl(path).inspect_err(|e| {
        log::error!("inspect_container failed for {}: {e}", path.display());
    })
}

fn inspect_container_impl(path: &Path) -> Result<ContainerSummary> {
    let file = File::open(path)?;
    if let Some(dataset) = open_fixed_dataset(&file)? {
        let geometry = FixedGeometry::of(&dataset)?;
        let event_counts = EventCountRegistry::open(&dataset)?.counts()?;
        return Ok(ContainerSummary::FixedCapacity {
            geometry,
            event_counts,
        });
    }

    let mut samples = Vec::new();
    for name in file.member_names()? {
        let Ok(offset) = name.parse::<usize>() else {
            continue;
        };
        let dataset = file.dataset(&name)?;
        let (channels, events) = sample_shape(&dataset, offset)?;
        samples.push(SampleSummary {
            sample: offset + 1,
            channels,
            events,
        });
    }
    samples.sort_by_key(|s| s.sample);
    Ok(ContainerSummary::PerSample { samples })
}

/// Returns `(channels, events)` of a per-sample dataset.
pub(crate) fn sample_shape(dataset: &Dataset, sample: usize) -> Result<(usize, usize)> {
    match dataset.shape().as_slice() {
        &[channels, events] => Ok((channels, events)),
        other => Err(Error::InvalidFormat(format!(
            "sample {} dataset must be 2-D (channel, event), found shape {other:?}",
            sample + 1
        ))),
    }
}
