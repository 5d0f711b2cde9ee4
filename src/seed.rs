//! Demo data
//!
//! Fixture loader for demo deployments. Only touches an empty ledger.

use rust_decimal::Decimal;

use crate::domain::{LedgerResult, Money};
use crate::store::LedgerStore;

const DEMO_CUSTOMERS: &[(&str, &str)] = &[
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Carol Davis", "carol@example.com"),
    ("David Wilson", "david@example.com"),
    ("Eva Brown", "eva@example.com"),
    ("Frank Miller", "frank@example.com"),
    ("Grace Lee", "grace@example.com"),
    ("Henry Clark", "henry@example.com"),
    ("Ivy Lewis", "ivy@example.com"),
    ("Jack Walker", "jack@example.com"),
];

/// (customer index into DEMO_CUSTOMERS, category, balance in cents)
const DEMO_ACCOUNTS: &[(usize, &str, i64)] = &[
    (0, "Checking", 120000),
    (0, "Savings", 540050),
    (1, "Checking", 30000),
    (2, "Savings", 900000),
    (3, "Checking", -2500),
    (4, "Savings", 15000),
    (5, "Checking", 75075),
    (6, "Savings", 5000),
    (7, "Checking", 0),
    (8, "Savings", 123456),
];

/// Seed demo customers and accounts. Returns `false` without writing if
/// any customer already exists.
pub async fn seed_demo_data(store: &LedgerStore) -> LedgerResult<bool> {
    if store.count_customers().await? > 0 {
        tracing::debug!("Ledger not empty, skipping demo seed");
        return Ok(false);
    }

    let mut customer_ids = Vec::with_capacity(DEMO_CUSTOMERS.len());
    for (name, email) in DEMO_CUSTOMERS {
        customer_ids.push(store.register_customer(name, email).await?);
    }

    for (owner, account_type, cents) in DEMO_ACCOUNTS {
        let balance = Money::new(Decimal::new(*cents, 2));
        store
            .register_account(customer_ids[*owner], account_type, balance)
            .await?;
    }

    tracing::info!(
        customers = DEMO_CUSTOMERS.len(),
        accounts = DEMO_ACCOUNTS.len(),
        "Demo data seeded"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seed_once() {
        let store = LedgerStore::connect("sqlite::memory:", 1).await.unwrap();
        store.initialize_schema().await.unwrap();

        assert!(seed_demo_data(&store).await.unwrap());
        assert!(!seed_demo_data(&store).await.unwrap());

        assert_eq!(store.count_customers().await.unwrap(), 10);
        let accounts = store.list_accounts(None).await.unwrap();
        assert_eq!(accounts.len(), 10);
        assert_eq!(accounts[1].balance.value(), dec!(5400.50));
        assert_eq!(accounts[4].balance.value(), dec!(-25.00));
        assert!(store.list_transactions(None).await.unwrap().is_empty());
    }
}
