//! Ledger integration tests: store, adjustments and reporting together

use bank_ledger::domain::{LedgerError, Money, TransactionKind};
use bank_ledger::handlers::AdjustmentHandler;
use bank_ledger::reporting::{NegativeBalance, ReportingService};
use rust_decimal_macros::dec;

mod common;

#[tokio::test]
async fn test_customer_ids_are_unique_and_increasing() {
    let store = common::setup_test_store().await;

    let mut previous = 0;
    for i in 0..5 {
        let id = store
            .register_customer(&format!("Customer {}", i), &format!("c{}@x.com", i))
            .await
            .unwrap();
        assert!(id > previous, "id {} not greater than {}", id, previous);
        previous = id;
    }

    let customers = store.list_customers().await.unwrap();
    assert_eq!(customers.len(), 5);
    assert!(customers.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(customers[0].name, "Customer 0");
}

#[tokio::test]
async fn test_duplicate_email_is_constraint_violation() {
    let store = common::setup_test_store().await;
    store.register_customer("Alice", "alice@x.com").await.unwrap();

    let result = store.register_customer("Alice Again", "alice@x.com").await;

    assert!(matches!(result, Err(LedgerError::ConstraintViolation(_))));
    assert_eq!(store.count_customers().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_accounts_filters_by_customer() {
    let store = common::setup_test_store().await;
    let alice = store.register_customer("Alice", "alice@x.com").await.unwrap();
    let bob = store.register_customer("Bob", "bob@x.com").await.unwrap();

    store.register_account(alice, "Checking", Money::ZERO).await.unwrap();
    store.register_account(bob, "Savings", Money::new(dec!(10))).await.unwrap();
    store.register_account(alice, "Savings", Money::new(dec!(5))).await.unwrap();

    let all = store.list_accounts(None).await.unwrap();
    assert_eq!(all.len(), 3);

    let alices = store.list_accounts(Some(alice)).await.unwrap();
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|a| a.customer_id == alice));
    assert_eq!(alices[1].account_type, "Savings");
}

#[tokio::test]
async fn test_account_for_unknown_customer_is_stored() {
    let store = common::setup_test_store().await;

    let id = store.register_account(404, "Checking", Money::ZERO).await.unwrap();

    assert_eq!(store.get_account(id).await.unwrap().customer_id, 404);
}

#[tokio::test]
async fn test_deposit_and_withdrawal() {
    let store = common::setup_test_store().await;
    let customer = store.register_customer("Alice", "alice@x.com").await.unwrap();
    let account = store
        .register_account(customer, "Checking", Money::new(dec!(40)))
        .await
        .unwrap();
    let handler = AdjustmentHandler::new(store.clone());

    handler.apply_adjustment(account, Money::new(dec!(100.0))).await.unwrap();
    assert_eq!(store.get_account(account).await.unwrap().balance.value(), dec!(140));

    handler.apply_adjustment(account, Money::new(dec!(-50.0))).await.unwrap();
    assert_eq!(store.get_account(account).await.unwrap().balance.value(), dec!(90));

    let log = store.list_transactions(Some(account)).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, TransactionKind::Deposit);
    assert_eq!(log[0].amount.value(), dec!(100));
    assert_eq!(log[1].kind, TransactionKind::Withdrawal);
    assert_eq!(log[1].amount.value(), dec!(-50));
}

#[tokio::test]
async fn test_zero_adjustment_logged_as_withdrawal() {
    let store = common::setup_test_store().await;
    let account = store.register_account(1, "Checking", Money::ZERO).await.unwrap();

    let result = AdjustmentHandler::new(store.clone())
        .apply_adjustment(account, Money::ZERO)
        .await
        .unwrap();

    assert_eq!(result.kind, TransactionKind::Withdrawal);
    assert_eq!(store.list_transactions(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_adjustment_on_missing_account_fails() {
    let store = common::setup_test_store().await;
    store.register_account(1, "Checking", Money::ZERO).await.unwrap();

    let result = AdjustmentHandler::new(store.clone())
        .apply_adjustment(2, Money::new(dec!(10)))
        .await;

    assert!(matches!(result, Err(LedgerError::NotFound { id: 2, .. })));
    assert!(store.list_transactions(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_summarize_is_idempotent() {
    let store = common::setup_test_store().await;
    let customer = store.register_customer("Alice", "alice@x.com").await.unwrap();
    store.register_account(customer, "Checking", Money::new(dec!(-5))).await.unwrap();
    store.register_account(customer, "Savings", Money::new(dec!(25))).await.unwrap();
    let reporting = ReportingService::new(store);

    let first = reporting.summarize().await.unwrap();
    let second = reporting.summarize().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total_balance.value(), dec!(20));
    assert_eq!(first.average_balance.value(), dec!(10));
}

#[tokio::test]
async fn test_alice_goes_negative() {
    let store = common::setup_test_store().await;

    let alice = store.register_customer("Alice", "alice@x.com").await.unwrap();
    assert_eq!(alice, 1);
    let checking = store
        .register_account(alice, "Checking", Money::new(dec!(100.0)))
        .await
        .unwrap();
    assert_eq!(checking, 1);

    let result = AdjustmentHandler::new(store.clone())
        .apply_adjustment(checking, Money::new(dec!(-150.0)))
        .await
        .unwrap();
    assert_eq!(result.new_balance.value(), dec!(-50));

    let summary = ReportingService::new(store).summarize().await.unwrap();
    assert_eq!(
        summary.negative_balance_accounts,
        vec![NegativeBalance {
            customer_name: "Alice".to_string(),
            account_type: "Checking".to_string(),
            balance: Money::new(dec!(-50)),
        }]
    );
}

#[tokio::test]
async fn test_transaction_log_matches_balance_delta() {
    let store = common::setup_test_store().await;
    let account = store
        .register_account(1, "Checking", Money::new(dec!(12.34)))
        .await
        .unwrap();
    let handler = AdjustmentHandler::new(store.clone());

    let amounts = [dec!(10.5), dec!(-3.25), dec!(0), dec!(-100), dec!(7.01)];
    for (i, amount) in amounts.iter().enumerate() {
        handler.apply_adjustment(account, Money::new(*amount)).await.unwrap();
        assert_eq!(store.list_transactions(None).await.unwrap().len(), i + 1);
    }

    let balance = store.get_account(account).await.unwrap().balance;
    let logged = store
        .list_transactions(Some(account))
        .await
        .unwrap()
        .iter()
        .fold(Money::ZERO, |acc, t| acc.checked_add(&t.amount).unwrap());

    assert_eq!(logged.value(), balance.value() - dec!(12.34));
}

#[tokio::test]
async fn test_summarize_total_beyond_single_balance_range() {
    let store = common::setup_test_store().await;
    store.register_account(1, "Checking", Money::from_cents(i64::MAX)).await.unwrap();
    store.register_account(1, "Savings", Money::from_cents(i64::MAX)).await.unwrap();

    let summary = ReportingService::new(store).summarize().await.unwrap();

    assert_eq!(summary.account_count, 2);
    assert_eq!(summary.total_balance.value(), dec!(184467440737095516.14));
    assert_eq!(summary.average_balance, Money::from_cents(i64::MAX));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adjustments_keep_pairing() {
    let store = common::setup_test_store().await;
    let account = store.register_account(1, "Checking", Money::ZERO).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let handler = AdjustmentHandler::new(store.clone());
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                let amount = if i % 2 == 0 { dec!(3) } else { dec!(-1) };
                handler.apply_adjustment(account, Money::new(amount)).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let log = store.list_transactions(Some(account)).await.unwrap();
    assert_eq!(log.len(), 80);
    // 4 depositors * 10 * 3 - 4 withdrawers * 10 * 1
    assert_eq!(store.get_account(account).await.unwrap().balance.value(), dec!(80));
}

#[tokio::test]
async fn test_initialize_schema_discards_data() {
    let store = common::setup_test_store().await;
    store.register_customer("Alice", "alice@x.com").await.unwrap();

    store.initialize_schema().await.unwrap();

    assert_eq!(store.count_customers().await.unwrap(), 0);
    let id = store.register_customer("Alice", "alice@x.com").await.unwrap();
    assert_eq!(id, 1);
}
