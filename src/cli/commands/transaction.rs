use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{
    CategoryService, HistoryService, KindFilter, TransactionFilter, TransactionService,
};
use crate::ledger::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};

use super::{parse_amount, parse_date, usage, ParsedArgs};

const ADD_USAGE: &str =
    "add <income|expense> <amount> <category> <description...> [--date YYYY-MM-DD] [--tag TAG]";
const LIST_USAGE: &str = "list [--type all|income|expense] [--search TEXT] [--from DATE] [--to DATE]";
const UPDATE_USAGE: &str =
    "update <id> <field=value>... (fields: amount, category, description, date, type, tags)";
const DELETE_USAGE: &str = "delete <id> [--yes]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandEntry::new("list", "Show transactions, newest first", LIST_USAGE, cmd_list),
        CommandEntry::new("history", "Alias of `list`", LIST_USAGE, cmd_list),
        CommandEntry::new("update", "Change fields of a transaction", UPDATE_USAGE, cmd_update),
        CommandEntry::new("delete", "Remove a transaction", DELETE_USAGE, cmd_delete),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.expect_only(&["date", "tag"])?;
    let [kind, amount, category, description @ ..] = parsed.positional.as_slice() else {
        return Err(usage(ADD_USAGE));
    };
    if description.is_empty() {
        return Err(usage(ADD_USAGE));
    }

    let kind: TransactionKind = kind.parse()?;
    let amount = parse_amount(amount)?;
    let category = CategoryService::resolve(context.ledger.categories(), category, kind)?;
    let label = category.icon.clone();
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    let tags: Vec<String> = parsed.options("tag").map(str::to_string).collect();

    let draft = TransactionDraft::new(kind, amount, label, description.join(" "), date)
        .with_tags(tags);
    let report = TransactionService::add(&mut context.ledger, draft)?;
    let txn = &report.value;
    io::print_success(format!(
        "Recorded {} {} {} ({})",
        txn.kind,
        context.format_amount(txn.amount),
        txn.description,
        txn.id
    ));
    context.warn_unpersisted(report.persist_error());
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[])?;
    parsed.expect_only(&["type", "search", "from", "to"])?;
    if !parsed.positional.is_empty() {
        return Err(usage(LIST_USAGE));
    }
    let filter = TransactionFilter {
        search: parsed.option("search").map(str::to_string),
        kind: match parsed.option("type") {
            Some(raw) => raw.parse::<KindFilter>()?,
            None => KindFilter::All,
        },
        from: parsed.option("from").map(parse_date).transpose()?,
        to: parsed.option("to").map(parse_date).transpose()?,
    };

    let transactions = context.ledger.transactions();
    let matched = HistoryService::filter(transactions, &filter);
    if matched.is_empty() {
        if filter.is_active() {
            io::print_info("No transactions match the filter.");
        } else {
            io::print_info("No transactions yet. Use `add` to record one.");
        }
        return Ok(());
    }

    output::section("Transactions");
    print_transactions(context, matched.iter().copied());
    let totals = HistoryService::totals(transactions, &filter);
    io::print_info(format!(
        "{} record(s)  income {}  expense {}  balance {}",
        totals.count,
        context.format_amount(totals.income),
        context.format_amount(totals.expense),
        context.format_amount(totals.balance()),
    ));
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, assignments)) = args.split_first() else {
        return Err(usage(UPDATE_USAGE));
    };
    let current = context
        .ledger
        .transaction(id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("No transaction with id `{id}`")))?;

    let mut patch = TransactionPatch::default();
    let mut category_label = None;
    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| usage(UPDATE_USAGE))?;
        match field.trim().to_ascii_lowercase().as_str() {
            "amount" => patch.amount = Some(parse_amount(value)?),
            "category" => category_label = Some(value),
            "description" => patch.description = Some(value.trim().to_string()),
            "date" => patch.date = Some(parse_date(value)?),
            "type" | "kind" => patch.kind = Some(value.parse()?),
            "tags" => {
                patch.tags = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}`"
                )))
            }
        }
    }

    // A changed type must still fit the category the record ends up with.
    let kind = patch.kind.unwrap_or(current.kind);
    let label = category_label.unwrap_or(current.category.as_str());
    if category_label.is_some() || patch.kind.is_some() {
        let category = CategoryService::resolve(context.ledger.categories(), label, kind)?;
        patch.category = Some(category.icon.clone());
    }

    let report = TransactionService::update(&mut context.ledger, id, &patch)?;
    io::print_success(format!("Updated transaction {}", report.value.id));
    print_transactions(context, std::iter::once(&report.value));
    context.warn_unpersisted(report.persist_error());
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["yes"])?;
    let [id] = parsed.positional.as_slice() else {
        return Err(usage(DELETE_USAGE));
    };
    let Some(txn) = context.ledger.transaction(id) else {
        return Err(CommandError::Message(format!("No transaction with id `{id}`")));
    };
    let prompt = format!(
        "Delete `{}` ({} on {})?",
        txn.description,
        context.format_amount(txn.amount),
        txn.date
    );
    if !context.confirm(&prompt, parsed.switch("yes"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    let report = TransactionService::remove(&mut context.ledger, id)?;
    io::print_success(format!("Deleted transaction {}", report.value.id));
    context.warn_unpersisted(report.persist_error());
    Ok(())
}

pub(crate) fn print_transactions<'a>(
    context: &ShellContext,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) {
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::left("Description").max_width(32),
        TableColumn::right("Amount"),
    ]);
    for txn in transactions {
        let amount = context.format_amount(txn.signed_amount());
        let amount = if txn.is_income() {
            format!("+{amount}")
        } else {
            amount
        };
        table.push_row(vec![
            txn.id.clone(),
            txn.date.to_string(),
            CategoryService::label_for(context.ledger.categories(), txn),
            txn.description.clone(),
            output::signed_amount(amount, txn.is_income()),
        ]);
    }
    io::print_info(table.render());
}
