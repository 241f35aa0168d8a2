//! Bulk operations on the whole store: export, clear-all, and usage info.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::ledger_manager::LedgerManager;
use crate::core::utils::ensure_dir;
use crate::errors::BookError;
use crate::ledger::Transaction;

use super::ServiceResult;

const EXPORT_PREFIX: &str = "bookkeeping-data";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StorageInfo {
    pub record_count: usize,
    /// Length of the compact JSON encoding of the transaction list, in UTF-16
    /// code units. This is how browser storage sizes a string, so emoji and
    /// CJK text count less here than their UTF-8 byte length.
    pub size_units: usize,
}

impl StorageInfo {
    pub fn size_kib(&self) -> f64 {
        self.size_units as f64 / 1024.0
    }
}

/// Compile-time metadata emitted by the build script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: option_env!("BOOKKEEPING_BUILD_HASH").unwrap_or("unknown"),
            build_date: option_env!("BOOKKEEPING_BUILD_DATE").unwrap_or("unknown"),
            profile: option_env!("BOOKKEEPING_BUILD_PROFILE").unwrap_or("unknown"),
        }
    }
}

pub struct DataService;

impl DataService {
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("{EXPORT_PREFIX}-{}.json", date.format("%Y-%m-%d"))
    }

    /// Writes `transactions` as pretty JSON to `dir`, replacing an export
    /// taken earlier the same day. Returns the written path.
    pub fn export(
        transactions: &[Transaction],
        dir: &Path,
        date: NaiveDate,
    ) -> ServiceResult<PathBuf> {
        ensure_dir(dir)?;
        let path = dir.join(Self::export_file_name(date));
        let json = serde_json::to_string_pretty(transactions).map_err(BookError::from)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(BookError::from)?;
        fs::rename(&tmp, &path).map_err(BookError::from)?;
        tracing::info!(path = %path.display(), count = transactions.len(), "ledger exported");
        Ok(path)
    }

    /// Erases every key in the manager's store, then reloads so the manager
    /// holds the defaults again.
    pub fn clear_all(manager: &mut LedgerManager) -> ServiceResult<()> {
        let result = manager.store().clear();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "clearing the store failed");
        } else {
            tracing::warn!("all stored data cleared");
        }
        manager.reload();
        result.map_err(Into::into)
    }

    pub fn storage_info(transactions: &[Transaction]) -> ServiceResult<StorageInfo> {
        let encoded = serde_json::to_string(transactions).map_err(BookError::from)?;
        Ok(StorageInfo {
            record_count: transactions.len(),
            size_units: encoded.encode_utf16().count(),
        })
    }
}
