//! Ledger entities
//!
//! Plain data as read back from the store. None of these are mutated in
//! place by callers; the store owns the rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Money;

pub type CustomerId = i64;
pub type AccountId = i64;
pub type TransactionId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

/// A customer's account.
///
/// `customer_id` is a logical reference only; nothing checks that the
/// customer exists. `balance` may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: String,
    pub balance: Money,
}

/// Audit record written alongside every balance adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: Money,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

/// Classification of an adjustment by the sign of its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Positive amounts are deposits; zero and negative are withdrawals.
    pub fn classify(amount: &Money) -> Self {
        if amount.is_positive() {
            TransactionKind::Deposit
        } else {
            TransactionKind::Withdrawal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deposit" => Ok(TransactionKind::Deposit),
            "Withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_classify_by_sign() {
        assert_eq!(
            TransactionKind::classify(&Money::new(dec!(100))),
            TransactionKind::Deposit
        );
        assert_eq!(
            TransactionKind::classify(&Money::new(dec!(-50))),
            TransactionKind::Withdrawal
        );
    }

    #[test]
    fn test_zero_is_withdrawal() {
        assert_eq!(
            TransactionKind::classify(&Money::ZERO),
            TransactionKind::Withdrawal
        );
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [TransactionKind::Deposit, TransactionKind::Withdrawal] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert!("Refund".parse::<TransactionKind>().is_err());
    }
}
