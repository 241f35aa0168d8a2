use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::summary_service::{STATISTICS_MONTHS, TOP_CATEGORIES};
use crate::core::services::SummaryService;

use super::transaction::print_transactions;

const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Current month overview and recent activity",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "stats",
            "Monthly trend and top expense categories",
            "stats",
            cmd_stats,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let data = SummaryService::dashboard(
        context.ledger.transactions(),
        context.today(),
        context.config.recent_limit,
    );

    output::section(format!("Dashboard {}", data.month));
    io::print_info(format!(
        "  Balance  {}",
        context.format_amount(data.current_balance)
    ));
    io::print_info(format!(
        "  Income   {}",
        context.format_amount(data.monthly_income)
    ));
    io::print_info(format!(
        "  Expense  {}",
        context.format_amount(data.monthly_expense)
    ));

    output::section("Recent transactions");
    if data.recent_transactions.is_empty() {
        io::print_info("No transactions yet. Use `add` to record one.");
    } else {
        print_transactions(context, &data.recent_transactions);
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.ledger.transactions();
    let totals = SummaryService::totals(transactions);

    output::section("Totals");
    io::print_info(format!("  Income   {}", context.format_amount(totals.income)));
    io::print_info(format!("  Expense  {}", context.format_amount(totals.expense)));
    io::print_info(format!(
        "  Balance  {}",
        context.format_amount(totals.balance())
    ));

    output::section("Monthly trend");
    let months = SummaryService::recent_months(transactions, STATISTICS_MONTHS);
    if months.is_empty() {
        io::print_info("No data yet.");
    } else {
        let scale = months
            .iter()
            .map(|month| month.total_income.max(month.total_expense))
            .fold(0.0_f64, f64::max);
        let mut table = Table::new(vec![
            TableColumn::left("Month"),
            TableColumn::right("Income"),
            TableColumn::right("Expense"),
            TableColumn::right("Balance"),
            TableColumn::left(""),
        ]);
        for month in &months {
            table.push_row(vec![
                month.month.clone(),
                context.format_amount(month.total_income),
                context.format_amount(month.total_expense),
                context.format_amount(month.balance),
                bar(month.total_expense, scale),
            ]);
        }
        io::print_info(table.render());
    }

    output::section("Top expense categories");
    let shares = SummaryService::category_breakdown(transactions, TOP_CATEGORIES);
    if shares.is_empty() {
        io::print_info("No expenses recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    for share in shares {
        let label = context
            .ledger
            .category_for(&share.category)
            .map(|category| category.display_label())
            .unwrap_or(share.category);
        table.push_row(vec![
            label,
            context.format_amount(share.amount),
            format!("{:.1}%", share.percentage),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn bar(value: f64, scale: f64) -> String {
    if scale <= 0.0 {
        return String::new();
    }
    let filled = ((value / scale) * BAR_WIDTH as f64).round() as usize;
    let glyph = if output::current_preferences().plain_mode {
        "#"
    } else {
        "█"
    };
    glyph.repeat(filled.min(BAR_WIDTH))
}
