//! Processing strategy module for partition orchestration
//!
//! This module defines the Strategy pattern for running the per-partition
//! pipeline over a list of partitions and merging the results. Different
//! scheduling implementations (sequential, parallel worker pool) can be
//! selected at runtime.

use crate::cli::StrategyType;
use crate::core::PipelineConfig;
use crate::io::PartitionSource;
use crate::types::{AccountStats, SummaryError};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, PoolConfig};
pub use sync::SyncProcessingStrategy;

/// A partition that could not be summarized
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionFailure {
    /// Identifier of the failed partition
    pub partition: String,
    /// Why it failed
    pub error: SummaryError,
}

/// Merged outcome of a run
///
/// `stats` holds the concatenated results of every successful partition in
/// submission order. Failed partitions contribute nothing to `stats`; they are
/// listed in `failures` instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub stats: Vec<AccountStats>,
    pub failures: Vec<PartitionFailure>,
}

impl RunReport {
    /// Merge one partition's outcome into the report
    pub fn record(&mut self, partition: String, result: Result<Vec<AccountStats>, SummaryError>) {
        match result {
            Ok(stats) => self.stats.extend(stats),
            Err(error) => self.failures.push(PartitionFailure { partition, error }),
        }
    }

    /// Whether every partition completed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Processing strategy trait for partition orchestration
///
/// Each strategy runs the pipeline once per partition and merges the results.
/// A failing partition never aborts the run: it is recorded in the report and
/// the remaining partitions are still processed.
pub trait ProcessingStrategy: Send + Sync {
    /// Summarize every partition and merge the results
    ///
    /// # Errors
    ///
    /// Returns an error only when the run cannot start at all (invalid
    /// configuration, worker runtime creation failure). Per-partition errors
    /// are reported in `RunReport::failures`.
    fn process(&self, partitions: Vec<Box<dyn PartitionSource>>) -> Result<RunReport, SummaryError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `pipeline` - Per-partition pipeline configuration
/// * `pool` - Optional worker pool configuration (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    pipeline: PipelineConfig,
    pool: Option<PoolConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(pipeline)),
        StrategyType::Async => {
            let pool = pool.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(pipeline, pool))
        }
    }
}
