use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Display descriptor used to classify transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            kind,
        }
    }

    /// Whether a transaction category label refers to this entry, by icon,
    /// id, or case-insensitive name.
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.icon == label || self.id == label || self.name.eq_ignore_ascii_case(label)
    }

    pub fn display_label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

static DEFAULT_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    use TransactionKind::{Expense, Income};
    vec![
        Category::new("1", "Salary", "💼", "#10B981", Income),
        Category::new("2", "Investment", "📈", "#3B82F6", Income),
        Category::new("3", "Side Business", "💡", "#8B5CF6", Income),
        Category::new("4", "Other Income", "💰", "#F59E0B", Income),
        Category::new("5", "Dining", "🍽️", "#EF4444", Expense),
        Category::new("6", "Transport", "🚗", "#F97316", Expense),
        Category::new("7", "Shopping", "🛍️", "#EC4899", Expense),
        Category::new("8", "Entertainment", "🎮", "#8B5CF6", Expense),
        Category::new("9", "Housing", "🏠", "#6B7280", Expense),
        Category::new("10", "Medical", "🏥", "#DC2626", Expense),
        Category::new("11", "Education", "📚", "#059669", Expense),
        Category::new("12", "Other Expense", "💸", "#6B7280", Expense),
    ]
});

/// The seed catalog used when no catalog has been persisted.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES.clone()
}

/// Icon used for a transaction whose category could not be resolved.
pub const FALLBACK_CATEGORY_ICON: &str = "💰";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_catalog_has_four_income_and_eight_expense_entries() {
        let catalog = default_categories();
        assert_eq!(catalog.len(), 12);
        let income = catalog
            .iter()
            .filter(|c| c.kind == TransactionKind::Income)
            .count();
        assert_eq!(income, 4);
        let ids: HashSet<_> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn labels_match_icon_id_or_name() {
        let dining = default_categories()
            .into_iter()
            .find(|c| c.id == "5")
            .unwrap();
        assert!(dining.matches_label("🍽️"));
        assert!(dining.matches_label("5"));
        assert!(dining.matches_label("dining"));
        assert!(!dining.matches_label("🚗"));
    }

    #[test]
    fn serializes_kind_under_type_key() {
        let json = serde_json::to_value(&default_categories()[0]).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["icon"], "💼");
    }
}
