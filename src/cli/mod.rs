//! Interactive and scripted command shell over the ledger.

pub mod commands;
pub mod context;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::{CliMode, CommandError, CommandResult, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
