#![doc(test(attr(deny(warnings))))]

//! Bookkeeping Core is a personal income and expense ledger: typed records
//! persisted through a key-value store, dashboard and statistics projections,
//! and a command shell on top.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::ledger_manager::{LedgerManager, MutationReport, Snapshot};
pub use errors::{BookError, CliError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bookkeeping Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
