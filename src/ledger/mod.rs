//! Ledger records and the category catalog.

pub mod category;
pub mod transaction;

pub use category::{default_categories, Category, FALLBACK_CATEGORY_ICON};
pub use transaction::{
    generate_transaction_id, Transaction, TransactionDraft, TransactionKind, TransactionPatch,
};
