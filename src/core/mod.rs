//! Core business logic module
//!
//! This module contains the per-partition processing components:
//! - `aggregator` - Per-group statistics (date sort, daily netting, running balance)
//! - `pipeline` - Chunker → splitter → aggregator wiring for one partition

pub mod aggregator;
pub mod pipeline;

pub use aggregator::aggregate_group;
pub use pipeline::{process_partition, summarize_stream, PipelineConfig};
