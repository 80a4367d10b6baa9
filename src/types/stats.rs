//! Summary statistics produced per account group

use super::record::AccountId;
use rust_decimal::Decimal;

/// Per-account summary for one Group of one partition
///
/// Immutable once emitted. Two partitions holding the same account each emit
/// their own `AccountStats`; they are never combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStats {
    /// The account (grouping key) these statistics describe
    pub account_id: AccountId,

    /// Number of records in the group, before same-day netting
    pub num_transactions: usize,

    /// Sum of all signed amounts, before same-day netting
    pub total_transaction_amount: Decimal,

    /// Lowest end-of-day running balance, rounded to 2 decimal places
    pub min_balance: Decimal,

    /// Highest end-of-day running balance, rounded to 2 decimal places
    ///
    /// Floored at zero: an account that never goes positive reports 0.
    pub max_balance: Decimal,
}
