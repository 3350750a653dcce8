//! cytoslab-io: HDF5 slice storage for event matrices.
//!
//! A container holds one `events x channels` matrix per sample in one of two
//! layouts (see [`cytoslab_core::LayoutKind`]). Every public operation opens
//! the file, does its work and releases every HDF5 handle before returning,
//! on success and failure alike.
//!

pub mod container;
pub mod detect;
mod error;
mod reader;
pub mod registry;
mod transfer;
mod writer;

pub use container::{
    create_container, inspect_container, ContainerOptions, ContainerSummary, SampleSummary,
};
pub use detect::{detect_layout, FixedGeometry};
pub use error::{Error, Result};
pub use reader::{read_slice, read_slice_labeled};
pub use registry::EventCountRegistry;
pub use writer::write_slice;
