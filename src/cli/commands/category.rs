use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::CategoryService;
use crate::ledger::TransactionKind;

use super::usage;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "categories",
        "List the category catalog",
        "categories [income|expense]",
        cmd_categories,
    )]
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = match args {
        [] => None,
        [raw] => Some(raw.parse::<TransactionKind>()?),
        _ => return Err(usage("categories [income|expense]")),
    };

    let categories = CategoryService::list(context.ledger.categories(), kind);
    output::section(match kind {
        Some(kind) => format!("Categories ({kind})"),
        None => "Categories".to_string(),
    });
    let mut table = Table::new(vec![
        TableColumn::left("Icon"),
        TableColumn::left("Name"),
        TableColumn::left("Type"),
        TableColumn::left("Color"),
    ]);
    for category in categories {
        table.push_row(vec![
            category.icon.clone(),
            category.name.clone(),
            category.kind.to_string(),
            category.color.clone(),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}
