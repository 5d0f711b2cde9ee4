//! Domain module
//!
//! Ledger entities, the money primitive and the error taxonomy shared by
//! the store, the handlers and reporting.

pub mod error;
pub mod models;
pub mod money;

pub use error::{LedgerError, LedgerResult};
pub use models::{Account, AccountId, Customer, CustomerId, Transaction, TransactionId, TransactionKind};
pub use money::{Money, MoneyError};
