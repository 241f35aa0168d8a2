#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bookkeeping_core::{
    ledger::{TransactionDraft, TransactionKind},
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    LedgerManager,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn memory_manager() -> (LedgerManager, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    (LedgerManager::load(Arc::clone(&store)), store)
}

pub fn file_store(dir: PathBuf) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::new(dir, None).expect("open json store"))
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub fn salary() -> TransactionDraft {
    TransactionDraft::new(
        TransactionKind::Income,
        100.0,
        "💼",
        "salary",
        date("2024-01-05"),
    )
}

pub fn lunch() -> TransactionDraft {
    TransactionDraft::new(
        TransactionKind::Expense,
        30.0,
        "🍽️",
        "lunch",
        date("2024-01-05"),
    )
}
