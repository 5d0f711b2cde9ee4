//! Ledger Error Types
//!
//! Failures surfaced by the store, the adjustment handler and reporting.
//! They are independent of the web layer; `AppError` maps them to HTTP.

use thiserror::Error;

use super::MoneyError;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage medium unreachable or a statement was rejected
    #[error("Storage failure: {0}")]
    StorageFailure(#[source] sqlx::Error),

    /// Uniqueness or integrity rule violated at write time
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Amount could not be represented in the ledger
    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),
}

impl LedgerError {
    pub fn account_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Account",
            id,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(db_err.message().to_string())
            }
            _ => Self::StorageFailure(err),
        }
    }
}
