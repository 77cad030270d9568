//! # Seed Snapshot
//!
//! The bundled JSON snapshot the store is initialised from.
//!
//! ```text
//! seed/
//! ├── families.json      [Family, ...]
//! ├── fees.json          [Fee, ...]
//! ├── payments.json      [Payment, ...]
//! └── credentials.json   { phone: Credential }
//! ```
//!
//! A missing file counts as an empty list. On first start every list that is
//! not yet in the store is copied there from the seed; from then on the store
//! is the source of truth.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use shared::{CredentialMap, Family, Fee, Payment};

use super::traits::{load_json, save_json, KeyValueStore};
use super::{FAMILIES_KEY, FEES_KEY, NOTIFICATION_KEY, PAYMENTS_KEY};
use crate::domain::state::DirectoryData;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSnapshot {
    pub families: Vec<Family>,
    pub fees: Vec<Fee>,
    pub payments: Vec<Payment>,
    pub credentials: CredentialMap,
}

impl SeedSnapshot {
    /// Read the snapshot files from `directory`
    pub fn from_directory<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        if !directory.exists() {
            warn!("Seed directory {} does not exist, starting empty", directory.display());
            return Ok(Self::default());
        }

        let snapshot = Self {
            families: read_seed_file(directory, "families.json")?,
            fees: read_seed_file(directory, "fees.json")?,
            payments: read_seed_file(directory, "payments.json")?,
            credentials: read_seed_file(directory, "credentials.json")?,
        };

        info!(
            "Loaded seed from {}: {} families, {} fees, {} payments, {} credentials",
            directory.display(),
            snapshot.families.len(),
            snapshot.fees.len(),
            snapshot.payments.len(),
            snapshot.credentials.len()
        );
        Ok(snapshot)
    }
}

fn read_seed_file<T: DeserializeOwned + Default>(directory: &Path, name: &str) -> Result<T> {
    let path = directory.join(name);
    if !path.exists() {
        info!("Seed file {} not found, using empty default", path.display());
        return Ok(T::default());
    }
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Stored copy of `key`, or the seed copy which is written to the store
fn load_or_seed<T: Serialize + DeserializeOwned + Clone>(store: &dyn KeyValueStore, key: &str, seed: &T) -> Result<T> {
    match load_json(store, key)? {
        Some(stored) => Ok(stored),
        None => {
            info!("No stored copy of {}, initialising from seed", key);
            save_json(store, key, seed)?;
            Ok(seed.clone())
        }
    }
}

/// Stored copy of `key`, or the seed copy without touching the store
fn load_or_fallback<T: DeserializeOwned + Clone>(store: &dyn KeyValueStore, key: &str, seed: &T) -> Result<T> {
    Ok(load_json(store, key)?.unwrap_or_else(|| seed.clone()))
}

/// Startup load: every missing list is initialised in the store from the seed
pub fn load_directory(store: &dyn KeyValueStore, seed: &SeedSnapshot) -> Result<DirectoryData> {
    Ok(DirectoryData {
        families: load_or_seed(store, FAMILIES_KEY, &seed.families)?,
        fees: load_or_seed(store, FEES_KEY, &seed.fees)?,
        payments: load_or_seed(store, PAYMENTS_KEY, &seed.payments)?,
        notification: load_json(store, NOTIFICATION_KEY)?,
    })
}

/// Re-read everything from the store; missing lists fall back to the seed
/// but are not written back
pub fn reload_directory(store: &dyn KeyValueStore, seed: &SeedSnapshot) -> Result<DirectoryData> {
    Ok(DirectoryData {
        families: load_or_fallback(store, FAMILIES_KEY, &seed.families)?,
        fees: load_or_fallback(store, FEES_KEY, &seed.fees)?,
        payments: load_or_fallback(store, PAYMENTS_KEY, &seed.payments)?,
        notification: load_json(store, NOTIFICATION_KEY)?,
    })
}
