use std::path::PathBuf;

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{BuildInfo, DataService};

use super::{usage, ParsedArgs};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write all transactions to a dated JSON file",
            "export [dir]",
            cmd_export,
        ),
        CommandEntry::new(
            "clear",
            "Erase all stored data (cannot be undone)",
            "clear [--yes]",
            cmd_clear,
        ),
        CommandEntry::new(
            "info",
            "Show version, data location, and storage usage",
            "info",
            cmd_info,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => context.config_manager.export_dir(&context.config),
        [dir] => PathBuf::from(dir),
        _ => return Err(usage("export [dir]")),
    };
    let transactions = context.ledger.transactions();
    let path = DataService::export(transactions, &dir, context.today())?;
    io::print_success(format!(
        "Exported {} transaction(s) to {}",
        transactions.len(),
        path.display()
    ));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["yes"])?;
    if !parsed.positional.is_empty() {
        return Err(usage("clear [--yes]"));
    }
    let prompt = "Erase all transactions and categories? This cannot be undone.";
    if !context.confirm(prompt, parsed.switch("yes"))? {
        io::print_info("Nothing cleared.");
        return Ok(());
    }
    DataService::clear_all(&mut context.ledger)?;
    io::print_success("All data cleared.");
    Ok(())
}

fn cmd_info(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = BuildInfo::current();
    let storage = DataService::storage_info(context.ledger.transactions())?;

    output::section(format!("Bookkeeping {}", build.version));
    io::print_info(format!("  Build date   : {}", build.build_date));
    io::print_info(format!("  Build hash   : {}", build.git_hash));
    io::print_info(format!("  Profile      : {}", build.profile));

    output::section("Data");
    io::print_info(format!("  Records      : {}", storage.record_count));
    io::print_info(format!("  Storage size : {:.2} KB", storage.size_kib()));
    io::print_info(format!(
        "  Data dir     : {}",
        context.config_manager.base_dir().display()
    ));
    io::print_info(format!(
        "  Config file  : {}",
        context.config_manager.path().display()
    ));
    io::print_info(format!(
        "  Locale       : {} ({})",
        context.config.locale, context.config.currency_symbol
    ));
    Ok(())
}
