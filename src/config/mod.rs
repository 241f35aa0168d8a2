use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    services::summary_service::DEFAULT_RECENT_LIMIT,
    utils::{ensure_dir, write_atomic, PathResolver},
};
use crate::errors::BookError;
use crate::storage::DEFAULT_QUOTA_BYTES;

/// User preferences persisted as `config.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    /// Transactions listed on the dashboard.
    pub recent_limit: usize,
    /// Byte quota for the store; `0` disables the limit.
    pub storage_quota_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Disables colors and emoji-heavy decorations.
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency_symbol: "¥".into(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            export_dir: None,
            plain_output: false,
        }
    }
}

impl Config {
    pub fn storage_quota(&self) -> Option<u64> {
        (self.storage_quota_bytes > 0).then_some(self.storage_quota_bytes)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, -amount)
        } else {
            format!("{}{:.2}", self.currency_symbol, amount.abs())
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, BookError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, BookError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                BookError::Config(format!("{}: {err}", self.path.display()))
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BookError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn store_dir(&self) -> PathBuf {
        PathResolver::store_dir_in(&self.base)
    }

    /// Export target: the configured directory, else `exports/` under the base.
    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(&self.base))
    }
}
