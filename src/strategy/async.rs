//! Asynchronous worker-pool processing strategy
//!
//! This module provides a parallel implementation of the ProcessingStrategy
//! trait. Every partition runs the full pipeline on its own worker; workers
//! share nothing but the read-only pipeline configuration.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── PoolConfig (max_concurrent_partitions)
//!     ├── tokio multi-thread runtime
//!     │     └── blocking pool capped at the budget
//!     ├── Semaphore (FIFO admission, one permit per running partition)
//!     └── join_all barrier → RunReport (concatenated in submission order)
//! ```
//!
//! # Scheduling
//!
//! - Budget = min(max_concurrent_partitions, partition count)
//! - Partitions are admitted in submission order: the submitter waits for a
//!   permit before spawning the next worker, so excess partitions queue FIFO
//! - Results are merged once, after every worker has finished
//! - A panicking worker fails its own partition only

use crate::core::{process_partition, PipelineConfig};
use crate::io::PartitionSource;
use crate::strategy::{ProcessingStrategy, RunReport};
use crate::types::SummaryError;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Configuration for the partition worker pool
#[derive(Clone, Debug, PartialEq)]
pub struct PoolConfig {
    /// Maximum number of partitions processed concurrently
    pub max_concurrent_partitions: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_concurrent_partitions: num_cpus::get(),
        }
    }
}

impl PoolConfig {
    /// Create a new PoolConfig, falling back to the default for zero
    pub fn new(max_concurrent_partitions: usize) -> Self {
        let default = Self::default();

        let max_concurrent_partitions = if max_concurrent_partitions == 0 {
            warn!(
                "Invalid max_concurrent_partitions ({}), using default ({})",
                max_concurrent_partitions, default.max_concurrent_partitions
            );
            default.max_concurrent_partitions
        } else {
            max_concurrent_partitions
        };

        Self {
            max_concurrent_partitions,
        }
    }

    /// Number of workers actually used for `partitions` partitions
    pub fn budget(&self, partitions: usize) -> usize {
        self.max_concurrent_partitions.min(partitions).max(1)
    }
}

/// Asynchronous worker-pool processing strategy
///
/// # Examples
///
/// ```
/// use rust_account_summary::core::PipelineConfig;
/// use rust_account_summary::io::{MemoryPartition, PartitionSource};
/// use rust_account_summary::strategy::{AsyncProcessingStrategy, PoolConfig, ProcessingStrategy};
///
/// let header = "user_id|account_id|amount|desc|date|type|misc\n";
/// let partitions: Vec<Box<dyn PartitionSource>> = vec![
///     Box::new(MemoryPartition::new("a", format!("{}1|1|5.00|x|2021-01-01|credit|\n", header))),
///     Box::new(MemoryPartition::new("b", format!("{}2|1|5.00|x|2021-01-01|debit|\n", header))),
/// ];
///
/// let strategy = AsyncProcessingStrategy::new(PipelineConfig::default(), PoolConfig::new(2));
/// let report = strategy.process(partitions).unwrap();
/// assert_eq!(report.stats.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    pipeline: PipelineConfig,
    pool: PoolConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(pipeline: PipelineConfig, pool: PoolConfig) -> Self {
        Self { pipeline, pool }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Summarize all partitions on a bounded worker pool
    ///
    /// 1. Builds a tokio runtime whose blocking pool is capped at the budget
    /// 2. Admits partitions in order, one semaphore permit each
    /// 3. Runs each partition's pipeline on a blocking worker
    /// 4. Waits for every worker, then concatenates results in submission order
    fn process(&self, partitions: Vec<Box<dyn PartitionSource>>) -> Result<RunReport, SummaryError> {
        self.pipeline.validate()?;
        if partitions.is_empty() {
            return Ok(RunReport::default());
        }

        let budget = self.pool.budget(partitions.len());
        debug!(
            "Processing {} partitions with {} workers",
            partitions.len(),
            budget
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(budget)
            .build()
            .map_err(|e| SummaryError::Runtime {
                message: e.to_string(),
            })?;

        runtime.block_on(async {
            let permits = Arc::new(Semaphore::new(budget));
            let pipeline = Arc::new(self.pipeline.clone());

            let mut ids = Vec::with_capacity(partitions.len());
            let mut workers = Vec::with_capacity(partitions.len());
            for source in partitions {
                let permit = Arc::clone(&permits)
                    .acquire_owned()
                    .await
                    .map_err(|e| SummaryError::Runtime {
                        message: e.to_string(),
                    })?;
                let pipeline = Arc::clone(&pipeline);

                ids.push(source.id().to_string());
                workers.push(tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    process_partition(source.as_ref(), &pipeline)
                }));
            }

            // Barrier: merge only after every worker is done
            let outcomes = join_all(workers).await;

            let mut report = RunReport::default();
            for (partition, outcome) in ids.into_iter().zip(outcomes) {
                let result = outcome.unwrap_or_else(|e| {
                    Err(SummaryError::WorkerPanicked {
                        partition: partition.clone(),
                        message: e.to_string(),
                    })
                });
                report.record(partition, result);
            }

            Ok::<_, SummaryError>(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryPartition;
    use crate::strategy::SyncProcessingStrategy;
    use crate::types::AccountStats;
    use rstest::rstest;
    use std::io::BufRead;

    const HEADER: &str = "user_id|account_id|amount|desc|date|type|misc\n";

    fn partition(id: &str, body: &str) -> Box<dyn PartitionSource> {
        Box::new(MemoryPartition::new(id, format!("{}{}", HEADER, body)))
    }

    fn sample_partitions() -> Vec<Box<dyn PartitionSource>> {
        (0..6)
            .map(|p| {
                let body: String = (0..4)
                    .flat_map(|a| {
                        (1..=3).map(move |d| {
                            format!(
                                "{}|0|{}.25|t|2021-01-0{}|{}|\n",
                                p * 10 + a,
                                d * 7,
                                d,
                                if (a + d) % 2 == 0 { "credit" } else { "debit" }
                            )
                        })
                    })
                    .collect();
                partition(&format!("p{}", p), &body)
            })
            .collect()
    }

    #[rstest]
    fn test_async_matches_sync(#[values(1, 2, 3, 16)] workers: usize) {
        let expected = SyncProcessingStrategy::new(PipelineConfig::default())
            .process(sample_partitions())
            .unwrap();
        let actual = AsyncProcessingStrategy::new(PipelineConfig::default(), PoolConfig::new(workers))
            .process(sample_partitions())
            .unwrap();

        assert_eq!(actual, expected);
        assert_eq!(actual.stats.len(), 24);
    }

    #[test]
    fn test_same_account_in_two_partitions_is_not_merged() {
        let strategy = AsyncProcessingStrategy::new(PipelineConfig::default(), PoolConfig::new(2));
        let report = strategy
            .process(vec![
                partition("a", "7|1|10.00|x|2021-01-01|credit|\n"),
                partition("b", "7|1|4.00|x|2021-01-01|debit|\n7|1|1.00|x|2021-01-02|credit|\n"),
            ])
            .unwrap();

        let sevens: Vec<&AccountStats> = report.stats.iter().filter(|s| s.account_id == 7).collect();
        assert_eq!(sevens.len(), 2);
        assert_eq!(sevens[0].num_transactions, 1);
        assert_eq!(sevens[1].num_transactions, 2);
    }

    #[test]
    fn test_failed_partition_is_reported_by_id() {
        let strategy = AsyncProcessingStrategy::new(PipelineConfig::default(), PoolConfig::new(4));
        let report = strategy
            .process(vec![
                partition("ok-1", "1|1|1.00|x|2021-01-01|credit|\n"),
                partition("broken", "nope|1|1.00|x|2021-01-01|credit|\n"),
                partition("ok-2", "2|1|1.00|x|2021-01-01|credit|\n"),
            ])
            .unwrap();

        let accounts: Vec<_> = report.stats.iter().map(|s| s.account_id).collect();
        assert_eq!(accounts, vec![1, 2]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].partition, "broken");
        assert_eq!(report.failures[0].error, SummaryError::malformed_key(2, "nope"));
    }

    struct PanickingPartition;

    impl PartitionSource for PanickingPartition {
        fn id(&self) -> &str {
            "panics"
        }

        fn open(&self) -> Result<Box<dyn BufRead + Send>, SummaryError> {
            panic!("disk on fire")
        }
    }

    #[test]
    fn test_worker_panic_fails_only_its_partition() {
        let strategy = AsyncProcessingStrategy::new(PipelineConfig::default(), PoolConfig::new(2));
        let report = strategy
            .process(vec![
                Box::new(PanickingPartition) as Box<dyn PartitionSource>,
                partition("fine", "5|1|1.00|x|2021-01-01|credit|\n"),
            ])
            .unwrap();

        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].partition, "panics");
        assert!(matches!(
            report.failures[0].error,
            SummaryError::WorkerPanicked { .. }
        ));
    }

    #[rstest]
    #[case::fewer_partitions_than_workers(8, 3, 3)]
    #[case::more_partitions_than_workers(2, 5, 2)]
    #[case::no_partitions(4, 0, 1)]
    fn test_budget(#[case] workers: usize, #[case] partitions: usize, #[case] expected: usize) {
        assert_eq!(PoolConfig::new(workers).budget(partitions), expected);
    }

    #[test]
    fn test_zero_workers_falls_back_to_cpu_count() {
        assert_eq!(PoolConfig::new(0).max_concurrent_partitions, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AsyncProcessingStrategy>();
    }
}
