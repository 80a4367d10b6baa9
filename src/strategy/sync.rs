//! Synchronous processing strategy
//!
//! This module provides a sequential, single-threaded implementation of the
//! ProcessingStrategy trait. Partitions are processed one after another on the
//! calling thread, which makes it the reference behavior the parallel strategy
//! is compared against.
//!
//! # Memory Efficiency
//!
//! Only one partition is open at a time, and within it only one group is
//! buffered, so memory use is O(largest group + one read batch + results).

use crate::core::{process_partition, PipelineConfig};
use crate::io::PartitionSource;
use crate::strategy::{ProcessingStrategy, RunReport};
use crate::types::SummaryError;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```
/// use rust_account_summary::core::PipelineConfig;
/// use rust_account_summary::io::{MemoryPartition, PartitionSource};
/// use rust_account_summary::strategy::{ProcessingStrategy, SyncProcessingStrategy};
///
/// let data = "user_id|account_id|amount|desc|date|type|misc\n\
///             7|1|20.00|coffee|2021-01-01|debit|\n";
/// let partitions: Vec<Box<dyn PartitionSource>> =
///     vec![Box::new(MemoryPartition::new("a", data))];
///
/// let strategy = SyncProcessingStrategy::new(PipelineConfig::default());
/// let report = strategy.process(partitions).unwrap();
/// assert_eq!(report.stats.len(), 1);
/// assert!(report.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    pipeline: PipelineConfig,
}

impl SyncProcessingStrategy {
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self { pipeline }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, partitions: Vec<Box<dyn PartitionSource>>) -> Result<RunReport, SummaryError> {
        self.pipeline.validate()?;

        let mut report = RunReport::default();
        for source in partitions {
            let result = process_partition(source.as_ref(), &self.pipeline);
            report.record(source.id().to_string(), result);
        }

        Ok(report)
    }
}
