use crate::core::PipelineConfig;
use crate::strategy::PoolConfig;
use crate::types::SummaryError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Summarize per-account transaction statistics from sorted, delimited logs
#[derive(Parser, Debug)]
#[command(name = "account-summary")]
#[command(about = "Summarize per-account transaction statistics from sorted, delimited logs", long_about = None)]
pub struct CliArgs {
    /// Input partitions (plain or gzip-compressed), each sorted by account id
    #[arg(value_name = "INPUT", required = true, help = "Paths to the input partitions")]
    pub inputs: Vec<PathBuf>,

    /// Processing strategy to use for the partitions
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for a parallel worker pool"
    )]
    pub strategy: StrategyType,

    /// Number of lines read per batch by the chunker
    #[arg(
        long = "buffer-size",
        value_name = "LINES",
        help = "Lines read per batch (default: 10000)"
    )]
    pub buffer_size: Option<usize>,

    /// Maximum number of partitions processed concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of partitions processed concurrently (default: CPU cores)"
    )]
    pub max_concurrent_partitions: Option<usize>,

    /// Field delimiter
    #[arg(long = "delimiter", value_name = "CHAR", default_value = "|")]
    pub delimiter: char,

    /// chrono format string for the date column
    #[arg(long = "date-format", value_name = "FORMAT", default_value = "%Y-%m-%d")]
    pub date_format: String,

    /// Treat the first line of every partition as data instead of a header
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Fail a partition whose account ids are not ascending
    #[arg(long = "verify-order")]
    pub verify_order: bool,

    /// Write the summary to a file instead of stdout
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the pipeline configuration from CLI arguments
    ///
    /// Unset values fall back to defaults. A delimiter that is not a single
    /// ASCII character, or that would break parsing, is rejected.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig, SummaryError> {
        if !self.delimiter.is_ascii() {
            return Err(SummaryError::invalid_config(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )));
        }

        let default = PipelineConfig::default();
        let config = PipelineConfig {
            delimiter: self.delimiter as u8,
            date_format: self.date_format.clone(),
            has_header: !self.no_header,
            verify_order: self.verify_order,
            ..default.clone()
        }
        .with_buffer_size(self.buffer_size.unwrap_or(default.buffer_size));

        config.validate()?;
        Ok(config)
    }

    /// Build the worker pool configuration from CLI arguments
    pub fn to_pool_config(&self) -> PoolConfig {
        match self.max_concurrent_partitions {
            Some(count) => PoolConfig::new(count),
            None => PoolConfig::default(),
        }
    }
}
