use anyhow::Result;
use log::info;
use std::sync::Arc;

use super::commands::directory::RefreshResult;
use super::state::{self, SharedDirectory};
use crate::storage::{reload_directory, SeedSnapshot, StoreHandle};

/// Reloads the shared lists from the store
#[derive(Clone)]
pub struct DirectoryService {
    store: StoreHandle,
    directory: SharedDirectory,
    seed: Arc<SeedSnapshot>,
}

impl DirectoryService {
    pub fn new(store: StoreHandle, directory: SharedDirectory, seed: Arc<SeedSnapshot>) -> Self {
        Self { store, directory, seed }
    }

    /// Re-read every list and the notification. Lists missing from the store
    /// fall back to the seed without being written.
    pub fn refresh(&self) -> Result<RefreshResult> {
        info!("Refreshing directory from store");

        let mut data = state::write(&self.directory)?;
        *data = reload_directory(self.store.as_ref(), &self.seed)?;

        let result = RefreshResult {
            families: data.families.len(),
            fees: data.fees.len(),
            payments: data.payments.len(),
            notification: data.notification.clone(),
        };
        info!(
            "Refreshed: {} families, {} fees, {} payments",
            result.families, result.fees, result.payments
        );
        Ok(result)
    }
}
