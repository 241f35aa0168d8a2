//! Key-value persistence substrate and the typed binding layered on top of it.

pub mod binding;
pub mod json_backend;
pub mod memory;

use crate::errors::BookError;

pub type Result<T> = std::result::Result<T, BookError>;

/// Key under which the transaction list is persisted.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key under which the category catalog is persisted.
pub const CATEGORIES_KEY: &str = "categories";

/// Default size limit for a store, matching the usual browser storage budget.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Synchronous string-keyed storage that outlives the process.
///
/// A `set` followed by a `get` of the same key must observe the written value;
/// there is no eventual consistency at this layer.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Erases every entry in one action.
    fn clear(&self) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Returns an error when writing `value` under `key` would push the store
/// past `limit`. `others` is the byte size already used by every other key.
pub(crate) fn check_quota(key: &str, value: &str, others: u64, limit: Option<u64>) -> Result<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let required = others + (key.len() + value.len()) as u64;
    if required > limit {
        return Err(BookError::QuotaExceeded {
            key: key.to_string(),
            required,
            limit,
        });
    }
    Ok(())
}

pub use binding::{read_or_default, write_value, StoredValue};
pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_check_counts_key_and_value() {
        assert!(check_quota("k", "abcd", 0, Some(5)).is_ok());
        let err = check_quota("k", "abcde", 0, Some(5)).expect_err("over quota");
        match err {
            BookError::QuotaExceeded { required, limit, .. } => {
                assert_eq!(required, 6);
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quota_check_is_disabled_without_limit() {
        assert!(check_quota("k", &"x".repeat(10_000), u64::MAX / 2, None).is_ok());
    }
}
