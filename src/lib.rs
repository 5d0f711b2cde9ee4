//! bank_ledger Library
//!
//! Customer/account ledger with an audited balance-adjustment flow,
//! reporting, and an axum HTTP surface gated by session cookies.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod reporting;
pub mod seed;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{LedgerError, LedgerResult, Money, MoneyError};
pub use error::{AppError, AppResult};
pub use store::LedgerStore;
