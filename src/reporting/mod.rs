//! Reporting module
//!
//! Read-only aggregate views over the ledger, computed fresh on every call.

mod service;

pub use service::{NegativeBalance, ReportingService, Summary};
