use cytoslab_core::{CompressionConfig, EventMatrix, VersionMode};
use cytoslab_io::{
    create_container, inspect_container, read_slice, read_slice_labeled, write_slice,
    ContainerOptions, ContainerSummary, Error,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn container_path(dir: &TempDir) -> PathBuf {
    dir.path().join("flow.h5")
}

/// Distinct, non-trivial values so misplaced rows are caught.
fn sample_matrix(events: usize, channels: usize, seed: f64) -> EventMatrix {
    let columns: Vec<Vec<f64>> = (0..channels)
        .map(|c| {
            (0..events)
                .map(|e| seed + (c * 10_000 + e) as f64 * 0.1 + 1.0 / 3.0)
                .collect()
        })
        .collect();
    EventMatrix::from_columns(&columns).unwrap()
}

fn write_default(
    path: &Path,
    matrix: &EventMatrix,
    channels: &[usize],
    sample: usize,
) -> Result<(), Error> {
    write_slice(path, matrix, channels, sample, CompressionConfig::default())
}

fn fixed_container(path: &Path) {
    let options = ContainerOptions::fixed(1000, 10, 5)
        .with_compression(CompressionConfig::new(6).unwrap())
        .with_version(VersionMode::Latest);
    create_container(path, &options).unwrap();
}

fn event_counts(path: &Path) -> Vec<u32> {
    match inspect_container(path).unwrap() {
        ContainerSummary::FixedCapacity { event_counts, .. } => event_counts,
        other @ ContainerSummary::PerSample { .. } => {
            panic!("expected fixed layout, got {other:?}")
        }
    }
}

#[test]
fn test_fixed_capacity_scenario() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    let input = sample_matrix(200, 3, 0.0);
    write_slice(&path, &input, &[1, 3, 5], 1, CompressionConfig::default()).unwrap();

    let output = read_slice(&path, &[1, 3, 5], 1).unwrap();
    assert_eq!(output.shape(), (200, 3));
    assert_eq!(output.values(), input.values());

    let unwritten = read_slice(&path, &[1, 3, 5], 4).unwrap();
    assert_eq!(unwritten.shape(), (0, 3));
}

#[test]
fn test_fixed_channel_subset_and_order() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    let input = sample_matrix(50, 3, 7.0);
    write_slice(&path, &input, &[2, 4, 6], 3, CompressionConfig::default()).unwrap();

    let reordered = read_slice(&path, &[6, 2], 3).unwrap();
    assert_eq!(reordered.column(0), input.column(2));
    assert_eq!(reordered.column(1), input.column(0));

    // Unwritten channels of a written slot hold the fill value.
    let untouched = read_slice(&path, &[1], 3).unwrap();
    assert_eq!(untouched.shape(), (50, 1));
    assert!(untouched.values().iter().all(|&v| v == 0.0));
}

#[test]
fn test_channel_index_boundaries() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    let input = sample_matrix(20, 2, 1.0);
    write_slice(&path, &input, &[1, 10], 5, CompressionConfig::default()).unwrap();
    assert_eq!(read_slice(&path, &[1], 5).unwrap().values(), input.column(0));
    assert_eq!(read_slice(&path, &[10], 5).unwrap().values(), input.column(1));

    let single = sample_matrix(20, 1, 1.0);
    assert!(matches!(
        write_slice(&path, &single, &[11], 5, CompressionConfig::default()),
        Err(Error::ChannelOutOfBounds {
            index: 11,
            capacity: 10
        })
    ));
    assert!(matches!(
        write_slice(&path, &single, &[0], 5, CompressionConfig::default()),
        Err(Error::CoreError(cytoslab_core::Error::InvalidIndex { .. }))
    ));
    assert!(matches!(
        read_slice(&path, &[11], 5),
        Err(Error::ChannelOutOfBounds { .. })
    ));
}

#[test]
fn test_sample_bounds_enforced() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    let input = sample_matrix(10, 1, 0.0);
    assert!(matches!(
        write_slice(&path, &input, &[1], 6, CompressionConfig::default()),
        Err(Error::SampleOutOfBounds {
            index: 6,
            capacity: 5
        })
    ));
    assert!(matches!(
        read_slice(&path, &[1], 6),
        Err(Error::SampleOutOfBounds {
            index: 6,
            capacity: 5
        })
    ));
    assert!(matches!(
        write_slice(&path, &input, &[1], 0, CompressionConfig::default()),
        Err(Error::CoreError(_))
    ));
    assert_eq!(event_counts(&path), vec![0; 5]);
}

#[test]
fn test_event_count_isolation() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    write_default(&path, &sample_matrix(120, 1, 0.0), &[1], 1).unwrap();
    write_default(&path, &sample_matrix(500, 2, 0.0), &[1, 2], 2).unwrap();
    assert_eq!(event_counts(&path), vec![120, 500, 0, 0, 0]);

    // The latest write defines the count, whichever channels it touched.
    write_default(&path, &sample_matrix(80, 1, 0.0), &[7], 2).unwrap();
    assert_eq!(event_counts(&path), vec![120, 80, 0, 0, 0]);
    assert_eq!(read_slice(&path, &[1, 2], 2).unwrap().shape(), (80, 2));
}

#[test]
fn test_event_capacity_exceeded() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    assert!(matches!(
        write_slice(&path, &sample_matrix(1001, 1, 0.0), &[1], 1, CompressionConfig::default()),
        Err(Error::EventCapacityExceeded {
            events: 1001,
            capacity: 1000
        })
    ));
    write_default(&path, &sample_matrix(1000, 1, 0.0), &[1], 1).unwrap();
    assert_eq!(event_counts(&path)[0], 1000);
}

#[test]
fn test_matrix_shape_must_match_channels() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);

    let input = sample_matrix(10, 2, 0.0);
    assert!(matches!(
        write_slice(&path, &input, &[1, 2, 3], 1, CompressionConfig::default()),
        Err(Error::CoreError(cytoslab_core::Error::ShapeMismatch(_)))
    ));
}

#[test]
fn test_per_sample_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    let input = sample_matrix(300, 4, 2.5);
    write_slice(&path, &input, &[1, 2, 3, 4], 2, CompressionConfig::default()).unwrap();

    let output = read_slice(&path, &[1, 2, 3, 4], 2).unwrap();
    assert_eq!(output, input);
}

#[test]
fn test_per_sample_lazy_creation_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    write_default(&path, &sample_matrix(40, 2, 0.0), &[1, 2], 3).unwrap();
    let second = sample_matrix(40, 2, 100.0);
    write_slice(&path, &second, &[1, 2], 3, CompressionConfig::default()).unwrap();

    match inspect_container(&path).unwrap() {
        ContainerSummary::PerSample { samples } => {
            assert_eq!(samples.len(), 1);
            assert_eq!(samples[0].sample, 3);
            assert_eq!((samples[0].channels, samples[0].events), (2, 40));
        }
        other @ ContainerSummary::FixedCapacity { .. } => panic!("unexpected {other:?}"),
    }
    assert_eq!(read_slice(&path, &[1, 2], 3).unwrap(), second);
}

#[test]
fn test_per_sample_never_written_reads_empty() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    let output = read_slice(&path, &[1, 2, 3], 9).unwrap();
    assert_eq!(output.shape(), (0, 3));
    assert!(output.is_empty());
}

#[test]
fn test_per_sample_sparse_channels() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    let input = sample_matrix(25, 3, 0.0);
    write_slice(&path, &input, &[1, 3, 5], 1, CompressionConfig::default()).unwrap();
    assert_eq!(read_slice(&path, &[1, 3, 5], 1).unwrap().values(), input.values());

    // The dataset spans up to the highest channel written; gaps stay zero.
    let gap = read_slice(&path, &[2], 1).unwrap();
    assert_eq!(gap.shape(), (25, 1));
    assert!(gap.values().iter().all(|&v| v == 0.0));

    // A later write may touch any channel inside that span.
    let update = sample_matrix(25, 1, 9.0);
    write_slice(&path, &update, &[4], 1, CompressionConfig::default()).unwrap();
    assert_eq!(read_slice(&path, &[4], 1).unwrap().values(), update.values());
}

#[test]
fn test_per_sample_geometry_mismatch_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    let original = sample_matrix(40, 2, 0.0);
    write_slice(&path, &original, &[1, 2], 1, CompressionConfig::default()).unwrap();

    let longer = sample_matrix(41, 2, 5.0);
    assert!(matches!(
        write_slice(&path, &longer, &[1, 2], 1, CompressionConfig::default()),
        Err(Error::GeometryMismatch {
            sample: 1,
            stored_channels: 2,
            stored_events: 40,
            channels: 2,
            events: 41
        })
    ));

    let wider = sample_matrix(40, 3, 5.0);
    assert!(matches!(
        write_slice(&path, &wider, &[1, 2, 3], 1, CompressionConfig::default()),
        Err(Error::GeometryMismatch { channels: 3, .. })
    ));

    // Rejected writes leave the stored values untouched.
    assert_eq!(read_slice(&path, &[1, 2], 1).unwrap(), original);
}

#[test]
fn test_per_sample_zero_event_write_rejected() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    create_container(&path, &ContainerOptions::per_sample()).unwrap();

    let empty = EventMatrix::empty(2);
    assert!(matches!(
        write_slice(&path, &empty, &[1, 2], 1, CompressionConfig::default()),
        Err(Error::CoreError(cytoslab_core::Error::InvalidGeometry(_)))
    ));
    assert_eq!(read_slice(&path, &[1, 2], 1).unwrap().shape(), (0, 2));
}

#[test]
fn test_labels_attached_on_read() {
    let dir = TempDir::new().unwrap();
    let path = container_path(&dir);
    fixed_container(&path);
    write_default(&path, &sample_matrix(5, 2, 0.0), &[1, 2], 1).unwrap();

    let labels = vec!["FSC-A".to_string(), "SSC-A".to_string()];
    let output = read_slice_labeled(&path, &[1, 2], 1, labels.clone()).unwrap();
    assert_eq!(output.labels(), Some(labels.as_slice()));

    assert!(matches!(
        read_slice_labeled(&path, &[1, 2], 1, vec!["FSC-A".to_string()]),
        Err(Error::CoreError(cytoslab_core::Error::ShapeMismatch(_)))
    ));
}

#[test]
fn test_compression_shrinks_redundant_data() {
    let dir = TempDir::new().unwrap();
    let redundant = EventMatrix::from_columns(&vec![vec![42.0; 100]; 4]).unwrap();

    let mut sizes = Vec::new();
    for level in [0, 6] {
        let path = dir.path().join(format!("level{level}.h5"));
        let compression = CompressionConfig::new(level).unwrap();
        let options = ContainerOptions::fixed(10_000, 4, 2).with_compression(compression);
        create_container(&path, &options).unwrap();
        write_slice(&path, &redundant, &[1, 2, 3, 4], 1, compression).unwrap();
        assert_eq!(read_slice(&path, &[1, 2, 3, 4], 1).unwrap().values(), redundant.values());
        sizes.push(std::fs::metadata(&path).unwrap().len());
    }
    assert!(sizes[1] < sizes[0], "level 6 {} vs level 0 {}", sizes[1], sizes[0]);
}

#[test]
fn test_missing_file_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.h5");
    assert!(matches!(read_slice(&path, &[1], 1), Err(Error::Hdf5(_))));
    assert!(matches!(
        write_slice(&path, &sample_matrix(1, 1, 0.0), &[1], 1, CompressionConfig::default()),
        Err(Error::Hdf5(_))
    ));
}
