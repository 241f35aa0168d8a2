use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::BookError;

const DEFAULT_DIR_NAME: &str = ".bookkeeping";
const STORE_DIR: &str = "store";
const EXPORT_DIR: &str = "exports";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const HOME_ENV: &str = "BOOKKEEPING_HOME";

/// Resolves where application data lives on disk.
pub struct PathResolver;

impl PathResolver {
    /// Returns the data directory, defaulting to `~/.bookkeeping`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Directory holding one JSON file per key-value entry.
    pub fn store_dir_in(base: &Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn export_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<(), BookError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used while a file is being replaced: `name.json` -> `name.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to the temp sibling of `path`, then renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), BookError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    drop(file);
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_in_base() {
        let base = PathBuf::from("/tmp/book");
        assert_eq!(PathResolver::store_dir_in(&base), base.join("store"));
        assert_eq!(PathResolver::export_dir_in(&base), base.join("exports"));
        assert_eq!(PathResolver::config_file_in(&base), base.join("config.json"));
    }

    #[test]
    fn tmp_path_appends_suffix_to_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/transactions.json")),
            PathBuf::from("/data/transactions.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/raw")), PathBuf::from("/data/raw.tmp"));
    }

    #[test]
    fn atomic_write_replaces_contents_and_cleans_up() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let target = temp.path().join("nested").join("config.json");
        write_atomic(&target, "{}").expect("first write");
        write_atomic(&target, "{\"a\":1}").expect("second write");
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"a\":1}");
        assert!(!tmp_path(&target).exists());
    }
}
