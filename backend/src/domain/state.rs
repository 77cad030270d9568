//! In-memory copy of the directory shared by all services.
//!
//! Lists are only ever replaced whole. A mutation takes the write lock, builds
//! the new list, saves it, and only then swaps it in, so a failed save leaves
//! the previous list in place and concurrent writers are serialised.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::{Family, Fee, Payment};

use super::error::DirectoryError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryData {
    pub families: Vec<Family>,
    pub fees: Vec<Fee>,
    pub payments: Vec<Payment>,
    pub notification: Option<String>,
}

pub type SharedDirectory = Arc<RwLock<DirectoryData>>;

pub fn shared_directory(data: DirectoryData) -> SharedDirectory {
    Arc::new(RwLock::new(data))
}

pub(crate) fn read(directory: &SharedDirectory) -> Result<RwLockReadGuard<'_, DirectoryData>, DirectoryError> {
    directory.read().map_err(|_| DirectoryError::LockPoisoned)
}

pub(crate) fn write(directory: &SharedDirectory) -> Result<RwLockWriteGuard<'_, DirectoryData>, DirectoryError> {
    directory.write().map_err(|_| DirectoryError::LockPoisoned)
}
