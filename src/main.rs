//! Rust Account Summary CLI
//!
//! Command-line interface for summarizing per-account statistics from sorted,
//! delimited (optionally gzip-compressed) transaction logs.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- data/transactions1.csv.gz data/transactions2.csv.gz > solution.csv
//! cargo run -- --strategy sync data/transactions1.csv.gz > solution.csv
//! cargo run -- --max-concurrent 4 --buffer-size 50000 -o solution.csv data/*.gz
//! ```
//!
//! Every input is one partition. Partitions are summarized independently and
//! the merged statistics are written as CSV (`user_id,n,sum,min,max`).
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: logging verbosity (`warn` by default; `info` shows partition progress)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Fatal error (invalid configuration, output not writable, etc.)
//! - 2: Some partitions failed; results of the others were still written

use log::error;
use rust_account_summary::cli::{self, CliArgs, StrategyType};
use rust_account_summary::io::{write_stats_csv, FilePartition, PartitionSource};
use rust_account_summary::strategy::{self, RunReport};
use rust_account_summary::SummaryError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    match run(&args) {
        Ok(report) if report.is_complete() => {}
        Ok(report) => {
            for failure in &report.failures {
                error!("Partition '{}' failed: {}", failure.partition, failure.error);
            }
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &CliArgs) -> Result<RunReport, SummaryError> {
    let pipeline = args.to_pipeline_config()?;
    let pool = if matches!(args.strategy, StrategyType::Async) {
        Some(args.to_pool_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy.clone(), pipeline, pool);

    let partitions: Vec<Box<dyn PartitionSource>> = args
        .inputs
        .iter()
        .map(|path| Box::new(FilePartition::new(path)) as Box<dyn PartitionSource>)
        .collect();

    let report = strategy.process(partitions)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| SummaryError::Output {
                message: format!("Failed to create '{}': {}", path.display(), e),
            })?;
            let mut output = BufWriter::new(file);
            write_stats_csv(&report.stats, &mut output)?;
            output.flush().map_err(|e| SummaryError::Output {
                message: e.to_string(),
            })?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut output = stdout.lock();
            write_stats_csv(&report.stats, &mut output)?;
        }
    }

    Ok(report)
}
