//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: Raw lines, groups and decoded transaction records
//! - `stats`: Per-account summary statistics
//! - `error`: Error types for the pipeline

pub mod error;
pub mod record;
pub mod stats;

pub use error::SummaryError;
pub use record::{parse_account_id, AccountId, Group, RawLine, Record, TransactionType};
pub use stats::AccountStats;
