use std::{fmt, str::FromStr};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookError;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One recorded financial event. `amount` is a magnitude; direction is `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    /// Free-form label, by convention the icon of a catalog category.
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Transaction {
    /// Month bucket in `YYYY-MM` form.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Amount with the sign implied by the transaction kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Direction of a transaction or the side of the catalog a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = BookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Ok(TransactionKind::Income),
            "expense" | "out" | "-" => Ok(TransactionKind::Expense),
            other => Err(BookError::InvalidInput(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

/// Field set of a transaction before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            description: description.into(),
            date,
            kind,
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = if tags.is_empty() { None } else { Some(tags) };
        self
    }

    /// Input checks applied by entry forms before a draft reaches the ledger.
    /// The ledger itself stores drafts as given.
    pub fn validate(&self) -> Result<(), BookError> {
        let mut problems = Vec::new();
        if !self.amount.is_finite() || self.amount <= 0.0 {
            problems.push("amount must be a positive number");
        }
        if self.category.trim().is_empty() {
            problems.push("category is required");
        }
        if self.description.trim().is_empty() {
            problems.push("description is required");
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(BookError::InvalidInput(problems.join("; ")))
        }
    }

    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
            kind: self.kind,
            tags: self.tags,
        }
    }
}

impl From<Transaction> for TransactionDraft {
    fn from(txn: Transaction) -> Self {
        Self {
            amount: txn.amount,
            category: txn.category,
            description: txn.description,
            date: txn.date,
            kind: txn.kind,
            tags: txn.tags,
        }
    }
}

/// Partial update merged into an existing transaction. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// An empty list clears the tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.kind.is_none()
            && self.tags.is_none()
    }

    pub fn apply(&self, txn: &mut Transaction) {
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(category) = &self.category {
            txn.category = category.clone();
        }
        if let Some(description) = &self.description {
            txn.description = description.clone();
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(tags) = &self.tags {
            txn.tags = if tags.is_empty() {
                None
            } else {
                Some(tags.clone())
            };
        }
    }
}

/// Builds an identifier from the current millisecond timestamp followed by
/// nine random base-36 characters.
pub fn generate_transaction_id() -> String {
    generate_transaction_id_at(Utc::now().timestamp_millis())
}

pub fn generate_transaction_id_at(millis: i64) -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut id = millis.to_string();
    for _ in 0..ID_SUFFIX_LEN {
        id.push(BASE36[(entropy % 36) as usize] as char);
        entropy /= 36;
    }
    id
}
