use crate::ledger::{Category, Transaction, TransactionKind, FALLBACK_CATEGORY_ICON};

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Catalog entries, optionally restricted to one side.
    pub fn list(categories: &[Category], kind: Option<TransactionKind>) -> Vec<&Category> {
        categories
            .iter()
            .filter(|category| kind.map_or(true, |kind| category.kind == kind))
            .collect()
    }

    /// Finds the catalog entry a user-supplied label refers to. The entry must
    /// belong to the same side as the transaction being recorded.
    pub fn resolve<'a>(
        categories: &'a [Category],
        label: &str,
        kind: TransactionKind,
    ) -> ServiceResult<&'a Category> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ServiceError::Invalid("Category is required".into()));
        }
        let category = categories
            .iter()
            .find(|category| category.matches_label(label))
            .ok_or_else(|| ServiceError::Invalid(format!("Unknown category `{label}`")))?;
        if category.kind != kind {
            return Err(ServiceError::Invalid(format!(
                "Category `{}` is an {} category",
                category.name, category.kind
            )));
        }
        Ok(category)
    }

    /// Icon and name shown for a transaction; unresolvable labels fall back
    /// to the generic icon and the raw label.
    pub fn label_for(categories: &[Category], txn: &Transaction) -> String {
        categories
            .iter()
            .find(|category| category.icon == txn.category)
            .or_else(|| {
                categories
                    .iter()
                    .find(|category| category.matches_label(&txn.category))
            })
            .map(Category::display_label)
            .unwrap_or_else(|| format!("{FALLBACK_CATEGORY_ICON} {}", txn.category))
    }
}
