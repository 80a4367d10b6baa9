//! Per-group aggregation
//!
//! Turns one Group of lines into one `AccountStats`.
//!
//! # Algorithm
//!
//! 1. Decode every line into a `Record`
//! 2. Stable-sort records by date (same-date records keep input order)
//! 3. Sign each amount (debits negative) and net same-date amounts into one
//!    daily delta
//! 4. Accumulate the daily deltas into a running balance and take its extremes
//!
//! Netting happens before the running balance is taken, so intra-day
//! excursions never show up in `min_balance` / `max_balance`. Downstream
//! consumers rely on this daily granularity.

use crate::io::format::decode_record;
use crate::types::{AccountId, AccountStats, Group, Record, SummaryError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Decimal places kept in the reported balances
pub const BALANCE_SCALE: u32 = 2;

/// Decode and aggregate one group
///
/// Takes the group by reference: aggregating the same group again yields the
/// same statistics.
pub fn aggregate_group(
    group: &Group,
    delimiter: u8,
    date_format: &str,
) -> Result<AccountStats, SummaryError> {
    let records = group
        .lines
        .iter()
        .map(|line| decode_record(line, group.key, delimiter, date_format))
        .collect::<Result<Vec<_>, _>>()?;

    compute_stats(group.key, records)
}

/// Compute statistics for one account's decoded records
///
/// Balances of a group without records are reported as zero.
fn compute_stats(
    account_id: AccountId,
    mut records: Vec<Record>,
) -> Result<AccountStats, SummaryError> {
    // sort_by_key is stable
    records.sort_by_key(|record| record.date);

    let mut total = Decimal::ZERO;
    let mut daily: Vec<(NaiveDate, Decimal)> = Vec::new();
    for record in &records {
        let signed = record.signed_amount();
        total = total
            .checked_add(signed)
            .ok_or_else(|| SummaryError::arithmetic_overflow("total transaction amount", account_id))?;

        match daily.last_mut() {
            Some((date, delta)) if *date == record.date => {
                *delta = delta
                    .checked_add(signed)
                    .ok_or_else(|| SummaryError::arithmetic_overflow("daily delta", account_id))?;
            }
            _ => daily.push((record.date, signed)),
        }
    }

    let mut balance = Decimal::ZERO;
    let mut extremes: Option<(Decimal, Decimal)> = None;
    for (_, delta) in &daily {
        balance = balance
            .checked_add(*delta)
            .ok_or_else(|| SummaryError::arithmetic_overflow("running balance", account_id))?;
        extremes = Some(match extremes {
            Some((min, max)) => (min.min(balance), max.max(balance)),
            None => (balance, balance),
        });
    }
    let (min, max) = extremes.unwrap_or((Decimal::ZERO, Decimal::ZERO));

    Ok(AccountStats {
        account_id,
        num_transactions: records.len(),
        total_transaction_amount: total,
        min_balance: min.round_dp(BALANCE_SCALE),
        max_balance: max.round_dp(BALANCE_SCALE).max(Decimal::ZERO),
    })
}
