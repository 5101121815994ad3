//! Key-value persistence contract.
//!
//! State is persisted as string-keyed JSON blobs. The core crate only
//! defines the contract and an in-memory implementation; the file-backed
//! store lives in the admin crate.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Keys of every persisted blob.
pub mod keys {
    /// Calculator form draft.
    pub const CALCULATOR_DRAFT: &str = "tanuki_calculator_draft";
    /// Global cost settings.
    pub const SETTINGS: &str = "tanuki_settings";
    /// Product catalog (array of products).
    pub const PRODUCTS: &str = "tanuki_products";
    /// Last fetched currency rates.
    pub const CURRENCY_RATES: &str = "tanuki_currency_rates";
    /// Manual currency rate configuration.
    pub const MANUAL_CURRENCY_RATES: &str = "tanuki_manual_currency_rates";
    /// Product being edited, consumed once by the calculator.
    pub const EDITING_PRODUCT: &str = "tanuki_editing_product";
}

/// Errors from a key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored blob is not valid JSON for the expected type.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed blob storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Load and decode a JSON blob.
///
/// # Errors
///
/// Returns `StoreError` if the store fails or the blob does not decode.
pub fn load_json<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Encode and save a JSON blob.
///
/// # Errors
///
/// Returns `StoreError` if encoding or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &raw)
}

/// Volatile store, used for tests and as the fallback when the configured
/// store cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ShopSettings;

    #[test]
    fn test_missing_key_loads_none() {
        let store = MemoryStore::new();
        let loaded: Option<ShopSettings> = load_json(&store, keys::SETTINGS).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_json_helpers_round_trip() {
        let store = MemoryStore::new();
        let settings = ShopSettings::default();
        save_json(&store, keys::SETTINGS, &settings).unwrap();
        let loaded: Option<ShopSettings> = load_json(&store, keys::SETTINGS).unwrap();
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn test_corrupt_blob() {
        let store = MemoryStore::new();
        store.save(keys::SETTINGS, "{not json").unwrap();
        let result: Result<Option<ShopSettings>, _> = load_json(&store, keys::SETTINGS);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.save("k", "1").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }
}
