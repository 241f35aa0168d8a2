//! Dashboard and statistics projections over a transaction snapshot.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionKind};

/// Months shown by the statistics trend.
pub const STATISTICS_MONTHS: usize = 6;
/// Expense categories shown by the statistics breakdown.
pub const TOP_CATEGORIES: usize = 5;
/// Transactions listed on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub count: usize,
}

impl Totals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    fn record(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Income => self.income += txn.amount,
            TransactionKind::Expense => self.expense += txn.amount,
        }
        self.count += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    /// `YYYY-MM`
    pub month: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

impl MonthlyStats {
    fn from_totals(month: String, totals: Totals) -> Self {
        Self {
            month,
            total_income: totals.income,
            total_expense: totals.expense,
            balance: totals.balance(),
            transaction_count: totals.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Share of total expense, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub month: String,
    pub current_balance: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub recent_transactions: Vec<Transaction>,
    pub monthly_stats: Vec<MonthlyStats>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_key(date: NaiveDate) -> String {
        date.format("%Y-%m").to_string()
    }

    pub fn totals<'a, I>(transactions: I) -> Totals
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Totals::default(), |mut totals, txn| {
                totals.record(txn);
                totals
            })
    }

    /// Per-month totals for every month with activity, oldest first.
    pub fn monthly_stats(transactions: &[Transaction]) -> Vec<MonthlyStats> {
        let mut months: BTreeMap<String, Totals> = BTreeMap::new();
        for txn in transactions {
            months.entry(txn.month_key()).or_default().record(txn);
        }
        months
            .into_iter()
            .map(|(month, totals)| MonthlyStats::from_totals(month, totals))
            .collect()
    }

    /// The latest `limit` months with activity, newest first.
    pub fn recent_months(transactions: &[Transaction], limit: usize) -> Vec<MonthlyStats> {
        let mut stats = Self::monthly_stats(transactions);
        stats.reverse();
        stats.truncate(limit);
        stats
    }

    pub fn month_totals(transactions: &[Transaction], month: &str) -> MonthlyStats {
        let totals = Self::totals(transactions.iter().filter(|txn| txn.month_key() == month));
        MonthlyStats::from_totals(month.to_string(), totals)
    }

    /// Expense totals grouped by category label, largest first.
    pub fn category_breakdown(transactions: &[Transaction], limit: usize) -> Vec<CategoryShare> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        let mut total_expense = 0.0;
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            *sums.entry(txn.category.as_str()).or_insert(0.0) += txn.amount;
            total_expense += txn.amount;
        }
        let mut shares: Vec<CategoryShare> = sums
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                category: category.to_string(),
                amount,
                percentage: if total_expense > 0.0 {
                    amount / total_expense * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        shares.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        shares.truncate(limit);
        shares
    }

    /// Current-month overview plus the newest `recent_limit` transactions.
    pub fn dashboard(
        transactions: &[Transaction],
        today: NaiveDate,
        recent_limit: usize,
    ) -> DashboardData {
        let month = Self::month_key(today);
        let current = Self::month_totals(transactions, &month);
        DashboardData {
            month,
            current_balance: current.balance,
            monthly_income: current.total_income,
            monthly_expense: current.total_expense,
            recent_transactions: transactions.iter().take(recent_limit).cloned().collect(),
            monthly_stats: Self::monthly_stats(transactions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionDraft;

    fn txn(kind: TransactionKind, amount: f64, category: &str, date: &str) -> Transaction {
        TransactionDraft::new(
            kind,
            amount,
            category,
            "entry",
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        )
        .into_transaction(format!("{category}-{date}-{amount}"))
    }

    fn sample() -> Vec<Transaction> {
        use TransactionKind::{Expense, Income};
        vec![
            txn(Expense, 30.0, "🍽️", "2024-01-05"),
            txn(Income, 100.0, "💼", "2024-01-05"),
            txn(Expense, 55.0, "🚗", "2023-12-20"),
            txn(Expense, 15.0, "🍽️", "2023-12-02"),
            txn(Income, 500.0, "💼", "2023-11-30"),
        ]
    }

    #[test]
    fn totals_split_by_kind() {
        let totals = SummaryService::totals(&sample());
        assert_eq!(totals.income, 600.0);
        assert_eq!(totals.expense, 100.0);
        assert_eq!(totals.balance(), 500.0);
        assert_eq!(totals.count, 5);
    }

    #[test]
    fn monthly_stats_group_by_month_key_oldest_first() {
        let stats = SummaryService::monthly_stats(&sample());
        let months: Vec<_> = stats.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01"]);
        let january = &stats[2];
        assert_eq!(january.total_income, 100.0);
        assert_eq!(january.total_expense, 30.0);
        assert_eq!(january.balance, 70.0);
        assert_eq!(january.transaction_count, 2);
    }

    #[test]
    fn recent_months_keeps_latest_window() {
        let stats = SummaryService::recent_months(&sample(), 2);
        let months: Vec<_> = stats.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2023-12"]);

        let all = SummaryService::recent_months(&sample(), 10);
        let months: Vec<_> = all.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2023-12", "2023-11"]);
    }

    #[test]
    fn category_breakdown_is_expense_only_and_sorted() {
        let shares = SummaryService::category_breakdown(&sample(), TOP_CATEGORIES);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, "🚗");
        assert_eq!(shares[0].amount, 55.0);
        assert_eq!(shares[1].category, "🍽️");
        assert_eq!(shares[1].amount, 45.0);
        assert!((shares[0].percentage - 55.0).abs() < 1e-9);
        assert!((shares[1].percentage - 45.0).abs() < 1e-9);

        let top = SummaryService::category_breakdown(&sample(), 1);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn category_breakdown_of_income_only_ledger_is_empty() {
        let income = vec![txn(TransactionKind::Income, 10.0, "💼", "2024-01-01")];
        assert!(SummaryService::category_breakdown(&income, TOP_CATEGORIES).is_empty());
    }

    #[test]
    fn dashboard_reports_current_month_and_recent_entries() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let data = SummaryService::dashboard(&sample(), today, 3);
        assert_eq!(data.month, "2024-01");
        assert_eq!(data.monthly_income, 100.0);
        assert_eq!(data.monthly_expense, 30.0);
        assert_eq!(data.current_balance, 70.0);
        assert_eq!(data.recent_transactions.len(), 3);
        assert_eq!(data.recent_transactions[0].category, "🍽️");
        assert_eq!(data.monthly_stats.len(), 3);
    }

    #[test]
    fn dashboard_for_quiet_month_is_zeroed() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let data = SummaryService::dashboard(&[], today, DEFAULT_RECENT_LIMIT);
        assert_eq!(data.current_balance, 0.0);
        assert!(data.recent_transactions.is_empty());
        assert!(data.monthly_stats.is_empty());
    }
}
