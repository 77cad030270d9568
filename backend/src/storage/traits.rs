//! # Storage Traits
//!
//! The storage abstraction the domain layer is written against. Any backing
//! medium that can read and write a string under a key (files, an embedded
//! database, a remote API) can host the directory without changes to the
//! domain.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Key-value persistence used for every list the directory keeps
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, `None` if nothing is stored
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Shared handle to whichever store the application was started with
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Load and parse a JSON document stored under `key`
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.load(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Stored value under '{}' is not valid JSON for its type", key))?;
            debug!("Loaded '{}' ({} bytes)", key, raw.len());
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and store it under `key`
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize value for '{}'", key))?;
    store.save(key, &raw)?;
    debug!("Saved '{}' ({} bytes)", key, raw.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use shared::Fee;

    #[test]
    fn test_save_then_load_json() {
        let store = MemoryStore::new();
        let fees = vec![Fee {
            id: "1".to_string(),
            title: "Dues".to_string(),
            category: Default::default(),
            amount: 100.0,
        }];

        save_json(&store, "fees", &fees).unwrap();
        let loaded: Vec<Fee> = load_json(&store, "fees").unwrap().unwrap();
        assert_eq!(loaded, fees);
    }

    #[test]
    fn test_load_json_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<Fee>> = load_json(&store, "missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_json_reports_malformed_value() {
        let store = MemoryStore::new();
        store.save("fees", "{not json").unwrap();
        let result: Result<Option<Vec<Fee>>> = load_json(&store, "fees");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("'fees'"), "unexpected error: {}", message);
    }
}
