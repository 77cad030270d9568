//! Test utilities for storage-backed tests.
//!
//! The temporary directory is removed when the environment is dropped, even if
//! the test panics.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::json_file::JsonFileStore;
use super::memory::MemoryStore;
use super::traits::KeyValueStore as _;
use super::traits::StoreHandle;

pub struct TestEnvironment {
    /// Kept alive so the directory is not removed until drop
    _temp_dir: TempDir,
    pub store: JsonFileStore,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let store = JsonFileStore::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            store,
            base_path,
        })
    }

    pub fn handle(&self) -> StoreHandle {
        Arc::new(self.store.clone())
    }

    /// Write a seed file into `<base>/seed/<name>` and return the seed directory
    pub fn write_seed_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let seed_dir = self.base_path.join("seed");
        std::fs::create_dir_all(&seed_dir)?;
        std::fs::write(seed_dir.join(name), content)?;
        Ok(seed_dir)
    }
}

/// Store whose writes always fail, for checking that a failed save leaves the
/// in-memory lists alone
#[derive(Debug, Default)]
pub struct FailingStore;

impl super::traits::KeyValueStore for FailingStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("Refusing to save '{}'", key)
    }

    fn remove(&self, key: &str) -> Result<()> {
        anyhow::bail!("Refusing to remove '{}'", key)
    }
}

/// In-memory store that fails writes to a single key and accepts everything else
#[derive(Debug)]
pub struct RejectKeyStore {
    inner: MemoryStore,
    rejected: String,
}

impl RejectKeyStore {
    pub fn new(rejected: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            rejected: rejected.to_string(),
        }
    }
}

impl super::traits::KeyValueStore for RejectKeyStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        if key == self.rejected {
            anyhow::bail!("Refusing to save '{}'", key);
        }
        self.inner.save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}
