//! Rust Account Summary Library
//! # Overview
//!
//! This library turns large, sorted, pipe-delimited transaction logs into
//! per-account summary statistics without loading whole files into memory.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Group, Record, AccountStats, SummaryError)
//! - [`cli`] - CLI arguments parsing
//! - [`io`] - Partition input and output handling:
//!   - [`io::group_chunker`] - Streams lines and yields one Group per account run
//!   - [`io::field_splitter`] - Splits a line into fields, honoring backslash escapes
//!   - [`io::partition`] - File and in-memory partitions with gzip detection
//!   - [`io::format`] - Record decoding and CSV output
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Per-group statistics
//!   - [`core::pipeline`] - Chunker → splitter → aggregator for one partition
//! - [`strategy`] - Partition orchestration (sequential or worker pool)
//!
//! # Record Format
//!
//! `account_id|sub_account_id|amount|description|date|type|misc`
//!
//! `description` may contain the delimiter only when it is escaped with a
//! backslash. `type` is `credit` or `debit`.
//!
//! # Account Statistics
//!
//! For every run of lines sharing an account id:
//! - `num_transactions`: number of records
//! - `total_transaction_amount`: sum of signed amounts (debits negative)
//! - `min_balance`: lowest end-of-day running balance, 2 decimal places
//! - `max_balance`: highest end-of-day running balance, floored at zero

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{aggregate_group, PipelineConfig};
pub use io::{split_escaped, write_stats_csv, GroupChunker};
pub use strategy::{PartitionFailure, RunReport};
pub use types::{
    AccountId, AccountStats, Group, RawLine, Record, SummaryError, TransactionType,
};
