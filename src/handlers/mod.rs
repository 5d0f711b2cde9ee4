//! Command Handlers module
//!
//! Handlers that orchestrate multi-statement writes on the ledger store.

mod adjustment_handler;
mod commands;


pub use adjustment_handler::AdjustmentHandler;
pub use commands::*;
