//! # JSON File Store
//!
//! File-based [`KeyValueStore`] keeping one JSON document per key in a data
//! directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── era_families_v1.json
//! ├── era_fees_v1.json
//! ├── era_payments_v1.json
//! ├── era_notification.json
//! ├── era_credentials_v1.json
//! └── era_credentials_v1_hash.json
//! ```
//!
//! Writes go to a temp file that is then renamed over the target, so a reader
//! sees either the old document or the new one.

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;

const DEFAULT_DIRECTORY_NAME: &str = "era-directory";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_directory: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Platform data directory (e.g. `~/.local/share/era-directory`), or
    /// `./data` when the platform has none
    pub fn default_directory() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join(DEFAULT_DIRECTORY_NAME),
            None => {
                warn!("No platform data directory, falling back to ./data");
                PathBuf::from("data")
            }
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file holding `key`. Keys are restricted to a safe
    /// character set so they can never leave the base directory.
    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("Invalid storage key '{}'", key));
        }
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value for '{}' at {}", key, path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote '{}' to {}", key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed '{}' at {}", key, path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
