use anyhow::{anyhow, Result};
use log::{info, warn};
use std::sync::{Arc, RwLock};

use shared::{Credential, CredentialMap};

use crate::storage::{sync_with_storage, StoreHandle, CREDENTIALS_KEY};

/// Holds the issued credential map, kept in step with the bundled snapshot
#[derive(Clone)]
pub struct CredentialService {
    store: StoreHandle,
    credentials: Arc<RwLock<CredentialMap>>,
}

impl CredentialService {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            credentials: Arc::new(RwLock::new(CredentialMap::new())),
        }
    }

    /// Adopt the seed credentials when they differ from what the store last
    /// received, otherwise keep the stored copy. Returns the number loaded.
    pub fn sync_from_seed(&self, seed: &CredentialMap) -> Result<usize> {
        let current = sync_with_storage(self.store.as_ref(), CREDENTIALS_KEY, seed)?;
        let count = current.len();

        let mut credentials = self
            .credentials
            .write()
            .map_err(|_| anyhow!("Credential map lock poisoned"))?;
        *credentials = current;

        info!("Loaded {} credentials", count);
        Ok(count)
    }

    pub fn credential_for_phone(&self, phone: &str) -> Result<Option<Credential>> {
        let credentials = self
            .credentials
            .read()
            .map_err(|_| anyhow!("Credential map lock poisoned"))?;
        let credential = credentials.get(phone.trim()).cloned();
        if credential.is_none() {
            warn!("No credential issued for phone {}", phone);
        }
        Ok(credential)
    }

    /// The credential issued for `phone` when `password` matches it exactly
    pub fn check_password(&self, phone: &str, password: &str) -> Result<Option<Credential>> {
        let matched = self
            .credential_for_phone(phone)?
            .filter(|credential| credential.password == password);
        match &matched {
            Some(credential) => info!("Credential check passed for family {}", credential.family_id),
            None => warn!("Credential check failed for phone {}", phone),
        }
        Ok(matched)
    }
}
