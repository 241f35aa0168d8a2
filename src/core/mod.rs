pub mod ledger_manager;
pub mod services;
pub mod utils;

pub use ledger_manager::{LedgerManager, MutationReport, Snapshot};
