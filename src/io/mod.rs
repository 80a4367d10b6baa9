//! I/O module
//!
//! Handles partition input, line grouping, field splitting and output.
//!
//! # Components
//!
//! - `partition` - Partition sources (files, in-memory buffers) with gzip detection
//! - `group_chunker` - Streaming grouping of lines by account key
//! - `field_splitter` - Escape-aware field splitting
//! - `format` - Record decoding and CSV output serialization

pub mod field_splitter;
pub mod format;
pub mod group_chunker;
pub mod partition;

pub use field_splitter::{escape_field, split_escaped};
pub use format::{decode_record, write_stats_csv, FIELD_COUNT};
pub use group_chunker::GroupChunker;
pub use partition::{FilePartition, MemoryPartition, PartitionSource};
