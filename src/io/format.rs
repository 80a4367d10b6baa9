//! Record and output format handling
//!
//! This module centralizes the text format concerns, providing:
//! - Conversion from a raw delimited line to a decoded `Record`
//! - Serialization of account statistics to CSV
//!
//! All functions are pure apart from writing to the supplied writer.

use crate::io::field_splitter::split_escaped;
use crate::types::{AccountId, AccountStats, RawLine, Record, SummaryError, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Number of columns in a transaction line
///
/// `account_id|sub_account_id|amount|description|date|type|misc`
pub const FIELD_COUNT: usize = 7;

/// Header row written ahead of the statistics
pub const OUTPUT_HEADER: [&str; 5] = ["user_id", "n", "sum", "min", "max"];

/// Decode one raw line of the group keyed by `account`
///
/// This function:
/// - Splits the line on `delimiter`, honoring backslash escapes
/// - Parses the amount as a Decimal and the date with `date_format`
/// - Matches the type token case-sensitively against `credit` and `debit`
///
/// Columns beyond the seventh are ignored. Nothing is coerced: any invalid
/// column yields a `MalformedRecord` error naming the line.
pub fn decode_record(
    line: &RawLine,
    account: AccountId,
    delimiter: u8,
    date_format: &str,
) -> Result<Record, SummaryError> {
    let fields = split_escaped(&line.text, delimiter);
    if fields.len() < FIELD_COUNT {
        return Err(SummaryError::too_few_fields(
            account,
            line.number,
            fields.len(),
            FIELD_COUNT,
        ));
    }

    let amount_str = fields[2].trim();
    let amount = Decimal::from_str(amount_str)
        .map_err(|_| SummaryError::invalid_amount(account, line.number, fields[2]))?;

    let date = NaiveDate::parse_from_str(fields[4].trim(), date_format)
        .map_err(|_| SummaryError::invalid_date(account, line.number, fields[4]))?;

    let tx_type = TransactionType::parse(fields[5])
        .ok_or_else(|| SummaryError::invalid_transaction_type(account, line.number, fields[5]))?;

    Ok(Record {
        account_id: account,
        sub_account_id: fields[1].to_string(),
        amount,
        description: fields[3].to_string(),
        date,
        tx_type,
        misc: fields[6].to_string(),
    })
}

/// One output row
#[derive(Debug, Serialize)]
struct StatsRow {
    user_id: AccountId,
    n: usize,
    sum: String,
    min: String,
    max: String,
}

impl From<&AccountStats> for StatsRow {
    fn from(stats: &AccountStats) -> Self {
        StatsRow {
            user_id: stats.account_id,
            n: stats.num_transactions,
            sum: stats.total_transaction_amount.to_string(),
            min: format!("{:.2}", stats.min_balance),
            max: format!("{:.2}", stats.max_balance),
        }
    }
}

/// Write account statistics to CSV format
///
/// Writes rows with columns: user_id, n, sum, min, max. Rows are sorted by
/// account id for deterministic output; the sort is stable, so an account that
/// appears in several partitions keeps one row per partition in merge order.
pub fn write_stats_csv(stats: &[AccountStats], output: &mut dyn Write) -> Result<(), SummaryError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(OUTPUT_HEADER)?;

    let mut sorted: Vec<&AccountStats> = stats.iter().collect();
    sorted.sort_by_key(|s| s.account_id);

    for entry in sorted {
        writer.serialize(StatsRow::from(entry))?;
    }

    writer.flush().map_err(|e| SummaryError::Output {
        message: format!("Failed to flush output: {}", e),
    })?;

    Ok(())
}
