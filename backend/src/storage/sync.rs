//! Snapshot synchronisation between a bundled seed and the store.
//!
//! The store keeps a hash of the seed copy it last wrote next to the data
//! (`<key>_hash`). On every start the current seed is hashed; when the stored
//! hash is missing or different the seed overwrites the stored copy, otherwise
//! the stored copy wins. This is a one-way overwrite, not a merge.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::traits::{load_json, save_json, KeyValueStore};

fn hash_key(storage_key: &str) -> String {
    format!("{}_hash", storage_key)
}

/// SHA-256 (hex) of the value's JSON serialization
pub fn data_hash<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    let json = serde_json::to_string(data).context("Failed to serialize data for hashing")?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Return the current data for `storage_key`: the stored copy when it was
/// written from this exact seed, otherwise the seed (which is then stored).
pub fn sync_with_storage<T>(store: &dyn KeyValueStore, storage_key: &str, seed: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let current_hash = data_hash(seed)?;
    let stored_hash: Option<String> = load_json(store, &hash_key(storage_key))?;

    if stored_hash.as_deref() == Some(current_hash.as_str()) {
        match load_json::<T>(store, storage_key) {
            Ok(Some(stored)) => {
                info!("[Sync] {} is up to date", storage_key);
                return Ok(stored);
            }
            Ok(None) => {}
            Err(e) => warn!("[Sync] Stored {} is unreadable, replacing it: {:#}", storage_key, e),
        }
    }

    info!("[Sync] Updating {} - hash changed or missing", storage_key);
    write_with_hash(store, storage_key, seed, &current_hash)?;
    Ok(seed.clone())
}

/// True when the stored hash for `storage_key` is missing or differs from the seed's
pub fn should_sync<T: Serialize + ?Sized>(store: &dyn KeyValueStore, storage_key: &str, seed: &T) -> Result<bool> {
    let current_hash = data_hash(seed)?;
    let stored_hash: Option<String> = load_json(store, &hash_key(storage_key))?;
    Ok(stored_hash.as_deref() != Some(current_hash.as_str()))
}

/// Overwrite the stored copy with the seed regardless of hashes
pub fn force_sync<T: Serialize + ?Sized>(store: &dyn KeyValueStore, storage_key: &str, seed: &T) -> Result<()> {
    let current_hash = data_hash(seed)?;
    write_with_hash(store, storage_key, seed, &current_hash)?;
    info!("[Sync] Force updated {}", storage_key);
    Ok(())
}

fn write_with_hash<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    storage_key: &str,
    data: &T,
    hash: &str,
) -> Result<()> {
    save_json(store, storage_key, data)?;
    save_json(store, &hash_key(storage_key), hash)?;
    Ok(())
}
