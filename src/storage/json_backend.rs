use std::{
    fmt::Write as _,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, write_atomic};

use super::{check_quota, KeyValueStore, Result};

const ENTRY_EXTENSION: &str = "json";
const ESCAPE: char = '_';
/// File stem standing in for the empty key.
const EMPTY_KEY_STEM: &str = "_";

/// Directory-backed store that keeps each key in its own JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    quota: Option<u64>,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf, quota: Option<u64>) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), ENTRY_EXTENSION))
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            paths.push(path);
        }
        paths.sort();
        Ok(paths)
    }

    /// Bytes used by every entry except `key`, counting names and contents.
    fn usage_excluding(&self, key: &str) -> Result<u64> {
        let skip = self.entry_path(key);
        let mut total = 0u64;
        for path in self.entry_paths()? {
            if path == skip {
                continue;
            }
            let name_len = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(decode_key)
                .map(|key| key.len())
                .unwrap_or(0) as u64;
            total += name_len + fs::metadata(&path)?.len();
        }
        Ok(total)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.quota.is_some() {
            check_quota(key, value, self.usage_excluding(key)?, self.quota)?;
        }
        write_atomic(&self.entry_path(key), value)?;
        tracing::debug!(key, bytes = value.len(), "store entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for path in self.entry_paths()? {
            fs::remove_file(path)?;
        }
        tracing::info!(dir = %self.dir.display(), "store cleared");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .entry_paths()?
            .iter()
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()))
            .filter_map(decode_key)
            .collect())
    }
}

/// Maps a key to a file stem. Bytes outside `[A-Za-z0-9-]` become `_XX`
/// (uppercase hex), so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return EMPTY_KEY_STEM.to_string();
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            let _ = write!(stem, "{ESCAPE}{byte:02X}");
        }
    }
    stem
}

/// Inverse of [`encode_key`]; `None` for stems this store did not produce.
fn decode_key(stem: &str) -> Option<String> {
    if stem == EMPTY_KEY_STEM {
        return Some(String::new());
    }
    let raw = stem.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut idx = 0;
    while idx < raw.len() {
        if raw[idx] == ESCAPE as u8 {
            let hex = stem.get(idx + 1..idx + 3)?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            idx += 3;
        } else {
            bytes.push(raw[idx]);
            idx += 1;
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BookError;
    use tempfile::TempDir;

    fn store_with_temp_dir(quota: Option<u64>) -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(temp.path().join("store"), quota).expect("json store");
        (store, temp)
    }

    #[test]
    fn set_then_get_returns_written_value() {
        let (store, _guard) = store_with_temp_dir(None);
        store.set("transactions", "[]").expect("set");
        assert_eq!(store.get("transactions").unwrap().as_deref(), Some("[]"));
        store.set("transactions", "[1]").expect("overwrite");
        assert_eq!(store.get("transactions").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (store, _guard) = store_with_temp_dir(None);
        assert!(store.get("categories").unwrap().is_none());
    }

    #[test]
    fn write_leaves_no_temp_file_behind() {
        let (store, _guard) = store_with_temp_dir(None);
        store.set("transactions", "[]").unwrap();
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["transactions.json".to_string()]);
    }

    #[test]
    fn clear_removes_every_entry() {
        let (store, _guard) = store_with_temp_dir(None);
        store.set("transactions", "[]").unwrap();
        store.set("categories", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["categories", "transactions"]);
        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(store.get("transactions").unwrap().is_none());
    }

    #[test]
    fn quota_counts_other_entries_but_not_the_overwritten_one() {
        let (store, _guard) = store_with_temp_dir(Some(40));
        store.set("a", &"x".repeat(20)).expect("first write fits");
        store.set("a", &"y".repeat(20)).expect("overwrite replaces usage");
        let err = store
            .set("b", &"z".repeat(20))
            .expect_err("second key exceeds quota");
        assert!(matches!(err, BookError::QuotaExceeded { .. }));
        assert_eq!(store.get("a").unwrap().unwrap(), "y".repeat(20));
        assert!(store.get("b").unwrap().is_none());
    }

    #[test]
    fn unsafe_key_characters_are_escaped_in_file_names() {
        let (store, _guard) = store_with_temp_dir(None);
        let path = store.entry_path("My Key/../x");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("My_20Key_2F_2E_2E_2Fx.json")
        );
        assert_eq!(path.parent(), Some(store.dir()));
    }

    #[test]
    fn similar_looking_keys_keep_separate_values() {
        let (store, _guard) = store_with_temp_dir(None);
        store.set("a b", "1").unwrap();
        store.set("a_b", "2").unwrap();
        store.set("Transactions", "3").unwrap();
        store.set("transactions", "4").unwrap();
        store.set("", "5").unwrap();
        assert_eq!(store.get("a b").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("Transactions").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("transactions").unwrap().as_deref(), Some("4"));
        assert_eq!(store.get("").unwrap().as_deref(), Some("5"));

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["", "Transactions", "a b", "a_b", "transactions"]);
    }

    #[test]
    fn key_encoding_round_trips_non_ascii() {
        for key in ["收入", "caf\u{e9}", "_5F", "x_"] {
            assert_eq!(decode_key(&encode_key(key)).as_deref(), Some(key));
        }
        assert_eq!(decode_key("broken_Z"), None);
    }
}
