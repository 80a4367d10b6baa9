//! Record-related types for the account summary pipeline
//!
//! This module defines the raw and decoded forms of a single transaction line
//! and the Group structure the chunker hands to the aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Account identifier (the grouping key)
///
/// Keys are compared numerically, so `"007"` and `"7"` name the same account.
pub type AccountId = u64;

/// Transaction types found in the `type` column
///
/// Matched case-sensitively against the literals `credit` and `debit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Adds the amount to the running balance
    Credit,

    /// Subtracts the amount from the running balance
    Debit,
}

impl TransactionType {
    /// Parse a type token, returning `None` for anything but `credit` or `debit`
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "credit" => Some(TransactionType::Credit),
            "debit" => Some(TransactionType::Debit),
            _ => None,
        }
    }

    /// Apply this type's sign to an amount
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        }
    }
}

/// One undecoded line as read from a partition stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based physical line number within the partition (header included)
    pub number: usize,

    /// Line text without its trailing newline
    pub text: String,
}

/// A maximal run of consecutive lines sharing one grouping key
///
/// Created by the chunker and consumed by the aggregator. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The key every line in `lines` carries
    pub key: AccountId,

    /// Lines in input order
    pub lines: Vec<RawLine>,
}

/// A fully decoded transaction line
///
/// The seven columns are `account_id|sub_account_id|amount|description|date|type|misc`.
/// `description` keeps any escape sequences exactly as they appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub account_id: AccountId,
    pub sub_account_id: String,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub tx_type: TransactionType,
    pub misc: String,
}

impl Record {
    /// The amount with the transaction type's sign applied
    pub fn signed_amount(&self) -> Decimal {
        self.tx_type.signed(self.amount)
    }
}

/// Parse a grouping key token
///
/// Surrounding whitespace is ignored. Returns `None` when the token is empty or
/// not an unsigned integer.
pub fn parse_account_id(token: &str) -> Option<AccountId> {
    token.trim().parse::<AccountId>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::credit("credit", Some(TransactionType::Credit))]
    #[case::debit("debit", Some(TransactionType::Debit))]
    #[case::uppercase("CREDIT", None)]
    #[case::mixed_case("Debit", None)]
    #[case::padded(" debit", None)]
    #[case::empty("", None)]
    fn test_transaction_type_parse(#[case] token: &str, #[case] expected: Option<TransactionType>) {
        assert_eq!(TransactionType::parse(token), expected);
    }

    #[rstest]
    #[case::credit(TransactionType::Credit, Decimal::new(4000, 2))]
    #[case::debit(TransactionType::Debit, Decimal::new(-4000, 2))]
    fn test_signed_amount(#[case] tx_type: TransactionType, #[case] expected: Decimal) {
        assert_eq!(tx_type.signed(Decimal::new(4000, 2)), expected);
    }

    #[rstest]
    #[case::plain("7", Some(7))]
    #[case::leading_zeros("007", Some(7))]
    #[case::whitespace("  42 ", Some(42))]
    #[case::empty("", None)]
    #[case::alphabetic("abc", None)]
    #[case::negative("-1", None)]
    #[case::fractional("1.5", None)]
    fn test_parse_account_id(#[case] token: &str, #[case] expected: Option<AccountId>) {
        assert_eq!(parse_account_id(token), expected);
    }
}
