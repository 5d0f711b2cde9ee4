//! Balance Adjustment Handler
//!
//! Applies a deposit or withdrawal to an account and appends the matching
//! audit record. Both writes commit together or not at all.

use crate::domain::{AccountId, LedgerError, LedgerResult, Money};
use crate::store::LedgerStore;

use super::{AdjustBalanceCommand, AdjustmentResult};

/// Handler for balance adjustments
#[derive(Debug, Clone)]
pub struct AdjustmentHandler {
    store: LedgerStore,
}

impl AdjustmentHandler {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Shorthand for executing an `AdjustBalanceCommand`.
    pub async fn apply_adjustment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> LedgerResult<AdjustmentResult> {
        self.execute(AdjustBalanceCommand::new(account_id, amount))
            .await
    }

    /// Execute the adjustment command
    ///
    /// Fails with `NotFound` if the account does not exist and with
    /// `InvalidAmount` if the new balance would not fit the ledger. On any
    /// failure neither the balance nor the audit trail changes.
    pub async fn execute(&self, command: AdjustBalanceCommand) -> LedgerResult<AdjustmentResult> {
        let amount_cents = command.amount.to_cents()?;
        let kind = command.kind();

        let _guard = self.store.lock_writes().await;
        let mut tx = self.store.pool().begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT balance_cents FROM accounts WHERE id = ?")
                .bind(command.account_id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current
            .map(Money::from_cents)
            .ok_or_else(|| LedgerError::account_not_found(command.account_id))?;

        let new_balance = current.checked_add(&command.amount)?;

        sqlx::query("UPDATE accounts SET balance_cents = ? WHERE id = ?")
            .bind(new_balance.to_cents()?)
            .bind(command.account_id)
            .execute(&mut *tx)
            .await?;

        let transaction_id =
            sqlx::query("INSERT INTO transactions (account_id, amount_cents, type) VALUES (?, ?, ?)")
                .bind(command.account_id)
                .bind(amount_cents)
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

        tx.commit().await?;

        tracing::debug!(
            account_id = command.account_id,
            transaction_id,
            amount = %command.amount,
            kind = %kind,
            new_balance = %new_balance,
            "Balance adjusted"
        );

        Ok(AdjustmentResult {
            transaction_id,
            account_id: command.account_id,
            amount: command.amount,
            kind,
            new_balance,
        })
    }
}
