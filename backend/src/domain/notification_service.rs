use anyhow::{Context, Result};
use log::info;

use super::state::{self, SharedDirectory};
use crate::storage::{save_json, StoreHandle, NOTIFICATION_KEY};

/// The single banner shown to every visitor
#[derive(Clone)]
pub struct NotificationService {
    store: StoreHandle,
    directory: SharedDirectory,
}

impl NotificationService {
    pub fn new(store: StoreHandle, directory: SharedDirectory) -> Self {
        Self { store, directory }
    }

    pub fn get_notification(&self) -> Result<Option<String>> {
        let data = state::read(&self.directory)?;
        Ok(data.notification.clone())
    }

    /// Set the banner text; empty text clears it and removes the stored key
    pub fn update_notification(&self, text: &str) -> Result<Option<String>> {
        let mut data = state::write(&self.directory)?;

        if text.is_empty() {
            info!("Clearing notification");
            self.store.remove(NOTIFICATION_KEY).context("Failed to remove notification")?;
            data.notification = None;
        } else {
            info!("Setting notification ({} chars)", text.chars().count());
            save_json(self.store.as_ref(), NOTIFICATION_KEY, text).context("Failed to save notification")?;
            data.notification = Some(text.to_string());
        }

        Ok(data.notification.clone())
    }
}
