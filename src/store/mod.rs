//! Ledger Store module
//!
//! Schema lifecycle and raw persistence for customers, accounts and
//! transactions.

mod repository;

pub use repository::LedgerStore;

/// Destructive schema reset: drops and recreates every ledger table
pub const SCHEMA_RESET: &str = include_str!("migrations/001_schema.sql");
