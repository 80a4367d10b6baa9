//! Error types for the account summary pipeline
//!
//! This module defines all error types that can occur while summarizing a
//! partition. Errors are designed to be descriptive and user-friendly for CLI
//! output, and are `Clone` so failed partitions can be carried in a run report.
//!
//! # Error Categories
//!
//! - **Stream Errors**: open, read or decompression failures (fatal to the partition)
//! - **Key Errors**: missing, non-numeric or out-of-order grouping keys (fatal to the partition)
//! - **Record Errors**: invalid amount, date, type or field count (fatal to the group)
//! - **Run Errors**: bad configuration, output failures, worker panics
//!
//! A trailing unescaped backslash is not an error; the field splitter drops it.

use super::record::AccountId;
use thiserror::Error;

/// Main error type for the account summary pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    /// Underlying read or decompression failure
    ///
    /// Retrying yields the same result, so the whole partition fails.
    #[error("Stream error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Stream {
        /// Line number being read when the failure occurred (if known)
        line: Option<usize>,
        /// Description of the failure
        message: String,
    },

    /// Grouping key missing or not numeric
    ///
    /// Key-change detection depends on comparable keys, so this is fatal
    /// to the partition.
    #[error("Malformed grouping key '{key}' at line {line}")]
    MalformedKey {
        /// Line number of the offending line
        line: usize,
        /// The raw key token
        key: String,
    },

    /// Key lower than its predecessor (only when order verification is enabled)
    #[error("Out-of-order grouping key at line {line}: {found} follows {previous}")]
    OutOfOrderKey {
        /// Line number of the offending line
        line: usize,
        /// Key of the preceding line
        previous: AccountId,
        /// Key found on this line
        found: AccountId,
    },

    /// Amount, date, type or field count invalid for a record
    #[error("Malformed record for account {account} at line {line}: {message}")]
    MalformedRecord {
        /// Account of the group being aggregated
        account: AccountId,
        /// Line number of the offending record
        line: usize,
        /// What was wrong with the record
        message: String,
    },

    /// Decimal arithmetic overflowed while accumulating
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being aggregated
        account: AccountId,
    },

    /// Configuration rejected before processing started
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Why the configuration is unusable
        message: String,
    },

    /// Writing results failed
    #[error("Output error: {message}")]
    Output {
        /// Description of the write failure
        message: String,
    },

    /// A partition worker panicked before producing a result
    #[error("Worker for partition '{partition}' panicked: {message}")]
    WorkerPanicked {
        /// Identifier of the partition the worker was processing
        partition: String,
        /// Panic description
        message: String,
    },

    /// The worker runtime could not be created
    #[error("Failed to create runtime: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to SummaryError
impl From<std::io::Error> for SummaryError {
    fn from(error: std::io::Error) -> Self {
        SummaryError::Stream {
            line: None,
            message: error.to_string(),
        }
    }
}

// csv is only used for writing results
impl From<csv::Error> for SummaryError {
    fn from(error: csv::Error) -> Self {
        SummaryError::Output {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SummaryError {
    /// Create a Stream error for a failed read at `line`
    pub fn stream(line: usize, error: &std::io::Error) -> Self {
        SummaryError::Stream {
            line: Some(line),
            message: error.to_string(),
        }
    }

    /// Create a MalformedKey error
    pub fn malformed_key(line: usize, key: &str) -> Self {
        SummaryError::MalformedKey {
            line,
            key: key.to_string(),
        }
    }

    /// Create a MalformedRecord error with a free-form message
    pub fn malformed_record(account: AccountId, line: usize, message: impl Into<String>) -> Self {
        SummaryError::MalformedRecord {
            account,
            line,
            message: message.into(),
        }
    }

    /// Create a MalformedRecord error for an unparseable amount
    pub fn invalid_amount(account: AccountId, line: usize, amount: &str) -> Self {
        Self::malformed_record(account, line, format!("invalid amount '{}'", amount))
    }

    /// Create a MalformedRecord error for an unparseable date
    pub fn invalid_date(account: AccountId, line: usize, date: &str) -> Self {
        Self::malformed_record(account, line, format!("invalid date '{}'", date))
    }

    /// Create a MalformedRecord error for an unknown transaction type
    pub fn invalid_transaction_type(account: AccountId, line: usize, tx_type: &str) -> Self {
        Self::malformed_record(account, line, format!("invalid transaction type '{}'", tx_type))
    }

    /// Create a MalformedRecord error for a line with too few fields
    pub fn too_few_fields(account: AccountId, line: usize, found: usize, expected: usize) -> Self {
        Self::malformed_record(
            account,
            line,
            format!("expected {} fields, found {}", expected, found),
        )
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        SummaryError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SummaryError::InvalidConfig {
            message: message.into(),
        }
    }
}
