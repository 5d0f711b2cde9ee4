//! Reporting Service
//!
//! Totals, averages and the negative-balance listing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{LedgerResult, Money, MoneyError};
use crate::store::LedgerStore;

/// Ledger-wide summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub account_count: i64,
    /// Sum of all balances; zero when there are no accounts
    pub total_balance: Money,
    /// Mean balance rounded to cents; zero when there are no accounts
    pub average_balance: Money,
    pub negative_balance_accounts: Vec<NegativeBalance>,
}

/// An overdrawn account joined with its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeBalance {
    pub customer_name: String,
    pub account_type: String,
    pub balance: Money,
}

#[derive(Debug, Clone)]
pub struct ReportingService {
    store: LedgerStore,
}

impl ReportingService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Build the summary inside one read transaction so the aggregates and
    /// the listing describe the same ledger state.
    pub async fn summarize(&self) -> LedgerResult<Summary> {
        let mut tx = self.store.pool().begin().await?;

        // SQLite's integer SUM overflows past i64; add exactly in Decimal instead
        let balances: Vec<i64> = sqlx::query_scalar("SELECT balance_cents FROM accounts")
            .fetch_all(&mut *tx)
            .await?;

        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT customers.name, accounts.account_type, accounts.balance_cents
            FROM accounts
            JOIN customers ON accounts.customer_id = customers.id
            WHERE accounts.balance_cents < 0
            ORDER BY accounts.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let account_count = balances.len() as i64;
        let total_balance = total_of(&balances)?;
        let negative_balance_accounts = rows
            .into_iter()
            .map(|(customer_name, account_type, balance_cents)| NegativeBalance {
                customer_name,
                account_type,
                balance: Money::from_cents(balance_cents),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            account_count,
            total_balance = %total_balance,
            negative = negative_balance_accounts.len(),
            "Summary computed"
        );

        Ok(Summary {
            account_count,
            total_balance,
            average_balance: total_balance.average_over(account_count),
            negative_balance_accounts,
        })
    }
}

fn total_of(balances: &[i64]) -> Result<Money, MoneyError> {
    balances
        .iter()
        .try_fold(Decimal::ZERO, |acc, cents| acc.checked_add(Decimal::new(*cents, 2)))
        .map(Money::new)
        .ok_or_else(|| MoneyError::OutOfRange("sum of balances".to_string()))
}
