//! Command definitions
//!
//! Commands represent intentions to change the ledger state.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Money, TransactionId, TransactionKind};

/// Command to apply a signed adjustment to an account balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustBalanceCommand {
    pub account_id: AccountId,
    /// Positive for a deposit, negative for a withdrawal
    pub amount: Money,
}

impl AdjustBalanceCommand {
    pub fn new(account_id: AccountId, amount: Money) -> Self {
        Self { account_id, amount }
    }

    /// Classification the audit record will carry
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::classify(&self.amount)
    }
}

/// Result of a committed adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub amount: Money,
    pub kind: TransactionKind,
    pub new_balance: Money,
}
