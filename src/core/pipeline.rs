//! Per-partition pipeline
//!
//! Wires the chunker, splitter and aggregator together for one partition:
//!
//! ```text
//! PartitionSource ─open─> BufRead ─> GroupChunker ─Group─> aggregate_group ─> Vec<AccountStats>
//!                                     (skips header)        (split + decode + stats)
//! ```
//!
//! A partition either completes or fails as a whole; no partial results are
//! returned.

use crate::core::aggregator::aggregate_group;
use crate::io::field_splitter::ESCAPE;
use crate::io::group_chunker::GroupChunker;
use crate::io::partition::PartitionSource;
use crate::types::{AccountStats, SummaryError};
use log::{debug, info, warn};
use std::io::BufRead;

/// Configuration for one partition pipeline
///
/// Shared read-only by every worker.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Field delimiter (must be ASCII and not a backslash)
    pub delimiter: u8,
    /// Lines read per batch by the chunker
    pub buffer_size: usize,
    /// `chrono` format string for the date column
    pub date_format: String,
    /// Whether the first line of each partition is a header row
    pub has_header: bool,
    /// Reject partitions whose keys are not ascending
    pub verify_order: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: b'|',
            buffer_size: 10_000,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            verify_order: false,
        }
    }
}

impl PipelineConfig {
    /// Set the chunker batch size, falling back to the default for zero
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = if buffer_size == 0 {
            let default = Self::default().buffer_size;
            warn!(
                "Invalid buffer_size ({}), using default ({})",
                buffer_size, default
            );
            default
        } else {
            buffer_size
        };
        self
    }

    /// Check the settings that would otherwise corrupt parsing
    pub fn validate(&self) -> Result<(), SummaryError> {
        if !self.delimiter.is_ascii() {
            return Err(SummaryError::invalid_config(format!(
                "delimiter byte 0x{:02x} is not ASCII",
                self.delimiter
            )));
        }
        if self.delimiter == ESCAPE {
            return Err(SummaryError::invalid_config(
                "delimiter cannot be the escape character '\\'",
            ));
        }
        if self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(SummaryError::invalid_config(
                "delimiter cannot be a line terminator",
            ));
        }
        if self.date_format.is_empty() {
            return Err(SummaryError::invalid_config("date format is empty"));
        }
        if self.buffer_size == 0 {
            return Err(SummaryError::invalid_config("buffer size must be positive"));
        }
        Ok(())
    }
}

/// Summarize every group of an already-opened line stream
pub fn summarize_stream<R: BufRead>(
    reader: R,
    config: &PipelineConfig,
) -> Result<Vec<AccountStats>, SummaryError> {
    let mut chunker = GroupChunker::new(reader, config.delimiter, config.buffer_size)
        .verify_order(config.verify_order);

    if config.has_header {
        if let Some(header) = chunker.skip_line()? {
            debug!("Skipped header: {}", header.text);
        }
    }

    let mut results = Vec::new();
    for group in chunker {
        let group = group?;
        let stats = aggregate_group(&group, config.delimiter, &config.date_format)?;
        debug!(
            "Account {}: {} transactions, total {}, min {}, max {}",
            stats.account_id,
            stats.num_transactions,
            stats.total_transaction_amount,
            stats.min_balance,
            stats.max_balance
        );
        results.push(stats);
    }

    Ok(results)
}

/// Open and summarize one partition
pub fn process_partition(
    source: &dyn PartitionSource,
    config: &PipelineConfig,
) -> Result<Vec<AccountStats>, SummaryError> {
    info!("Processing partition '{}'", source.id());
    let reader = source.open()?;
    let results = summarize_stream(reader, config)?;
    info!(
        "Finished partition '{}': {} accounts",
        source.id(),
        results.len()
    );
    Ok(results)
}
