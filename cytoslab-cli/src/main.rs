//! Command-line access to cytoslab event containers.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand, ValueEnum};
use cytoslab_core::{CompressionConfig, EventMatrix, LayoutKind, VersionMode};
use cytoslab_io::{ContainerOptions, ContainerSummary};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] cytoslab_io::Error),

    #[error("core error: {0}")]
    Core(#[from] cytoslab_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Physical layout selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// One pre-sized (sample, channel, event) dataset
    Fixed,
    /// One lazily created dataset per sample
    PerSample,
}

impl From<Layout> for LayoutKind {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Fixed => Self::FixedCapacity,
            Layout::PerSample => Self::PerSample,
        }
    }
}

/// File format compatibility selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Version {
    /// Readable by the oldest HDF5 releases
    Earliest,
    /// Newest object format
    Latest,
}

impl From<Version> for VersionMode {
    fn from(version: Version) -> Self {
        match version {
            Version::Earliest => Self::Earliest,
            Version::Latest => Self::Latest,
        }
    }
}

/// Chunked HDF5 storage for flow cytometry event matrices.
#[derive(Parser)]
#[command(name = "cytoslab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new container
    Create {
        /// Container file path
        path: PathBuf,

        /// Events per sample slot
        #[arg(long, default_value = "0")]
        events: usize,

        /// Channels per sample slot
        #[arg(long, default_value = "0")]
        channels: usize,

        /// Number of sample slots
        #[arg(long, default_value = "0")]
        samples: usize,

        /// Physical layout
        #[arg(short, long, value_enum, default_value = "fixed")]
        layout: Layout,

        /// Deflate level (0-9)
        #[arg(short, long, default_value = "6")]
        compression: u32,

        /// Format compatibility
        #[arg(long, value_enum, default_value = "latest")]
        format_version: Version,
    },

    /// Write a JSON matrix into channels of one sample
    Write {
        /// Container file path
        path: PathBuf,

        /// 1-based sample index
        #[arg(short, long)]
        sample: usize,

        /// 1-based channel indices, one per matrix column
        #[arg(long, value_delimiter = ',', required = true)]
        channels: Vec<usize>,

        /// JSON file with {"columns": [[...], ...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Deflate level for newly created sample datasets (0-9)
        #[arg(short, long, default_value = "6")]
        compression: u32,
    },

    /// Read channels of one sample as JSON
    Read {
        /// Container file path
        path: PathBuf,

        /// 1-based sample index
        #[arg(short, long)]
        sample: usize,

        /// 1-based channel indices
        #[arg(long, value_delimiter = ',', required = true)]
        channels: Vec<usize>,

        /// Column labels, one per channel
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show layout and occupancy of a container
    Info {
        /// Container file path
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Matrix input file: one array per channel column.
#[derive(Deserialize)]
struct MatrixInput {
    columns: Vec<Vec<f64>>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            path,
            events,
            channels,
            samples,
            layout,
            compression,
            format_version,
        } => {
            let options = ContainerOptions {
                event_capacity: events,
                channel_capacity: channels,
                sample_capacity: samples,
                layout: layout.into(),
                compression: CompressionConfig::new(compression)?,
                version: format_version.into(),
            };
            cytoslab_io::create_container(&path, &options)?;
            println!("Created {} ({:?})", path.display(), options.layout);
        }

        Commands::Write {
            path,
            sample,
            channels,
            input,
            compression,
        } => {
            let matrix = load_matrix(&input)?;
            let compression = CompressionConfig::new(compression)?;
            cytoslab_io::write_slice(&path, &matrix, &channels, sample, compression)?;
            println!(
                "Wrote {} events x {} channels to sample {}",
                matrix.n_events(),
                matrix.n_channels(),
                sample
            );
        }

        Commands::Read {
            path,
            sample,
            channels,
            labels,
            output,
        } => {
            let matrix = match labels {
                Some(labels) => cytoslab_io::read_slice_labeled(&path, &channels, sample, labels)?,
                None => cytoslab_io::read_slice(&path, &channels, sample)?,
            };
            let json = serde_json::to_string_pretty(&matrix)?;
            match output {
                Some(out) => {
                    fs::write(&out, json)?;
                    eprintln!(
                        "Read {} events x {} channels into {}",
                        matrix.n_events(),
                        matrix.n_channels(),
                        out.display()
                    );
                }
                None => println!("{}", json),
            }
        }

        Commands::Info { path, json } => {
            let summary = cytoslab_io::inspect_container(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&path, &summary);
            }
        }
    }

    Ok(())
}

fn load_matrix(path: &Path) -> Result<EventMatrix> {
    let text = fs::read_to_string(path)?;
    let input: MatrixInput = serde_json::from_str(&text)?;
    Ok(EventMatrix::from_columns(&input.columns)?)
}

fn print_summary(path: &Path, summary: &ContainerSummary) {
    println!("File: {}", path.display());
    println!("Layout: {:?}", summary.layout());
    match summary {
        ContainerSummary::FixedCapacity {
            geometry,
            event_counts,
        } => {
            println!(
                "Capacity: {} samples x {} channels x {} events",
                geometry.sample_capacity, geometry.channel_capacity, geometry.event_capacity
            );
            for (idx, count) in event_counts.iter().enumerate() {
                println!("  sample {:>4}: {} events", idx + 1, count);
            }
        }
        ContainerSummary::PerSample { samples } => {
            println!("Samples written: {}", samples.len());
            for s in samples {
                println!(
                    "  sample {:>4}: {} channels x {} events",
                    s.sample, s.channels, s.events
                );
            }
        }
    }
}
