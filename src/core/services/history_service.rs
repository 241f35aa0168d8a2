//! Searchable history view over the transaction list.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::BookError;
use crate::ledger::{Transaction, TransactionKind};

use super::summary_service::{SummaryService, Totals};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn matches(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

impl FromStr for KindFilter {
    type Err = BookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        Ok(match value.parse::<TransactionKind>()? {
            TransactionKind::Income => KindFilter::Income,
            TransactionKind::Expense => KindFilter::Expense,
        })
    }
}

/// Criteria for the history list. Every criterion left unset matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub kind: KindFilter,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn is_active(&self) -> bool {
        self.needle().is_some()
            || self.kind != KindFilter::All
            || self.from.is_some()
            || self.to.is_some()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if !self.kind.matches(txn.kind) {
            return false;
        }
        if self.from.is_some_and(|from| txn.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| txn.date > to) {
            return false;
        }
        match self.needle() {
            Some(needle) => txn.description.to_lowercase().contains(&needle),
            None => true,
        }
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

pub struct HistoryService;

impl HistoryService {
    /// Matching transactions in list order (newest entry first).
    pub fn filter<'a>(
        transactions: &'a [Transaction],
        filter: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| filter.matches(txn)).collect()
    }

    /// Totals over the matching transactions only.
    pub fn totals(transactions: &[Transaction], filter: &TransactionFilter) -> Totals {
        SummaryService::totals(transactions.iter().filter(|txn| filter.matches(txn)))
    }
}
