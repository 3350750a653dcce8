//! cytoslab-core: Core types for chunked event-matrix storage.
//!
//! This crate holds the storage-independent pieces: layout kinds,
//! compression settings, 1-based to 0-based index conversion, hyperslab
//! addressing and the in-memory [`EventMatrix`].
//!

pub mod compression;
pub mod error;
pub mod hyperslab;
pub mod index;
pub mod layout;
pub mod matrix;

pub use compression::CompressionConfig;
pub use error::{Error, Result};
pub use hyperslab::{plan_transfers, ChannelTransfer, FileRegion, MemoryRegion};
pub use index::{channel_offsets, to_zero_based, IndexKind};
pub use layout::{
    sample_dataset_name, LayoutKind, VersionMode, EVENT_COUNT_ATTR, FIXED_DATASET_NAME,
};
pub use matrix::EventMatrix;
