use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    Account, AccountId, Customer, CustomerId, LedgerError, LedgerResult, Money, Transaction,
    TransactionKind,
};

use super::SCHEMA_RESET;

type AccountRow = (i64, i64, String, i64);
type TransactionRow = (i64, i64, i64, String, NaiveDateTime);

/// Owned handle to the ledger database.
///
/// Cloning is cheap: clones share the pool and the write lock. Every write
/// path holds the write lock for its whole duration, so at most one writer
/// touches the ledger at a time.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl LedgerStore {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Connect to a SQLite database, creating the file if needed.
    ///
    /// In-memory databases live as long as their connection, so they get
    /// exactly one connection that is never recycled.
    pub async fn connect(database_url: &str, max_connections: u32) -> LedgerResult<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(false);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::debug!(database_url, in_memory, "Ledger store connected");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire the single-writer lock.
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Simple connectivity check
    pub async fn verify_connection(&self) -> LedgerResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Drop and recreate the ledger tables. All existing data is lost.
    pub async fn initialize_schema(&self) -> LedgerResult<()> {
        let _guard = self.lock_writes().await;
        let mut tx = self.pool.begin().await?;

        sqlx::query(SCHEMA_RESET).execute(&mut *tx).await?;

        tx.commit().await?;
        tracing::info!("Ledger schema initialized (previous data discarded)");
        Ok(())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Insert a customer. Fails with `ConstraintViolation` if the email is taken.
    pub async fn register_customer(&self, name: &str, email: &str) -> LedgerResult<CustomerId> {
        let _guard = self.lock_writes().await;

        let id = sqlx::query("INSERT INTO customers (name, email) VALUES (?, ?)")
            .bind(name)
            .bind(email)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::debug!(customer_id = id, "Customer registered");
        Ok(id)
    }

    /// All customers, oldest first.
    pub async fn list_customers(&self) -> LedgerResult<Vec<Customer>> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, email FROM customers ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email)| Customer { id, name, email })
            .collect())
    }

    pub async fn count_customers(&self) -> LedgerResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert an account with an opening balance.
    ///
    /// The owning customer is not checked; a dangling `customer_id` is
    /// stored as given.
    pub async fn register_account(
        &self,
        customer_id: CustomerId,
        account_type: &str,
        initial_balance: Money,
    ) -> LedgerResult<AccountId> {
        let balance_cents = initial_balance.to_cents()?;
        let _guard = self.lock_writes().await;

        let id = sqlx::query(
            "INSERT INTO accounts (customer_id, account_type, balance_cents) VALUES (?, ?, ?)",
        )
        .bind(customer_id)
        .bind(account_type)
        .bind(balance_cents)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!(account_id = id, customer_id, %initial_balance, "Account registered");
        Ok(id)
    }

    /// All accounts, or only those of one customer, ordered by id.
    pub async fn list_accounts(&self, customer_id: Option<CustomerId>) -> LedgerResult<Vec<Account>> {
        let rows: Vec<AccountRow> = match customer_id {
            Some(customer_id) => {
                sqlx::query_as(
                    r#"
                    SELECT id, customer_id, account_type, balance_cents
                    FROM accounts
                    WHERE customer_id = ?
                    ORDER BY id
                    "#,
                )
                .bind(customer_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, customer_id, account_type, balance_cents FROM accounts ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_account).collect())
    }

    pub async fn get_account(&self, account_id: AccountId) -> LedgerResult<Account> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, customer_id, account_type, balance_cents FROM accounts WHERE id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_account)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Audit trail, optionally restricted to one account, oldest first.
    pub async fn list_transactions(
        &self,
        account_id: Option<AccountId>,
    ) -> LedgerResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = match account_id {
            Some(account_id) => {
                sqlx::query_as(
                    r#"
                    SELECT id, account_id, amount_cents, type, date
                    FROM transactions
                    WHERE account_id = ?
                    ORDER BY id
                    "#,
                )
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, account_id, amount_cents, type, date FROM transactions ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(row_to_transaction).collect()
    }
}

fn row_to_account((id, customer_id, account_type, balance_cents): AccountRow) -> Account {
    Account {
        id,
        customer_id,
        account_type,
        balance: Money::from_cents(balance_cents),
    }
}

fn row_to_transaction(
    (id, account_id, amount_cents, kind, created_at): TransactionRow,
) -> LedgerResult<Transaction> {
    let kind = TransactionKind::from_str(&kind)
        .map_err(|e| LedgerError::StorageFailure(sqlx::Error::Decode(e.into())))?;

    Ok(Transaction {
        id,
        account_id,
        amount: Money::from_cents(amount_cents),
        kind,
        created_at: created_at.and_utc(),
    })
}
