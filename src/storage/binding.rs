//! Typed read/write view over a single key of a [`KeyValueStore`].

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};

use super::{KeyValueStore, Result};

/// Reads and deserializes `key`, falling back to `default` when the entry is
/// missing, unreadable, or not valid JSON for `T`. Never fails.
pub fn read_or_default<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: T,
) -> T {
    read_or_else(store, key, || default)
}

fn read_or_else<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "store read failed, using default");
            return default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value is malformed, using default");
            default()
        }
    }
}

/// Serializes `value` and overwrites `key`. The caller's value is untouched
/// whether or not the write succeeds.
pub fn write_value<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json).map_err(|err| {
        tracing::warn!(key, error = %err, "store write failed");
        err
    })
}

/// A handle bound to one key and one value type.
pub struct StoredValue<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StoredValue<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> StoredValue<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn load(&self, default: T) -> T {
        read_or_default(self.store.as_ref(), &self.key, default)
    }

    /// Like [`StoredValue::load`] but only builds the default when it is needed.
    pub fn load_or_else<F>(&self, default: F) -> T
    where
        F: FnOnce() -> T,
    {
        read_or_else(self.store.as_ref(), &self.key, default)
    }

    pub fn save(&self, value: &T) -> Result<()> {
        write_value(self.store.as_ref(), &self.key, value)
    }
}
