//! # Application Configuration
//!
//! Settings are read from a YAML file, then selected fields can be overridden
//! from the environment.
//!
//! ## Lookup Order
//!
//! 1. The file named by `ERA_DIRECTORY_CONFIG`
//! 2. `era_directory.yaml` in the working directory, if present
//! 3. Built-in defaults
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/var/lib/era-directory"
//! seed_directory: "./seed"
//! bind_address: "0.0.0.0:3000"
//! allowed_origin: "https://era.example.org"
//! log_filter: "info,era_directory=debug"
//! password_length: 6
//! ```
//!
//! Every field is optional. `ERA_DATA_DIR`, `ERA_SEED_DIR` and `ERA_BIND_ADDR`
//! override the matching fields.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::credentials::DEFAULT_PASSWORD_LENGTH;
use crate::storage::JsonFileStore;

pub const CONFIG_PATH_ENV: &str = "ERA_DIRECTORY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "era_directory.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the JSON store keeps its files
    pub data_directory: PathBuf,
    /// Bundled snapshot used to initialise an empty store
    pub seed_directory: PathBuf,
    pub bind_address: String,
    /// CORS origin allowed to call the API; any origin when unset
    pub allowed_origin: Option<String>,
    pub log_filter: String,
    pub password_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: JsonFileStore::default_directory(),
            seed_directory: PathBuf::from("seed"),
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: None,
            log_filter: "info".to_string(),
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

impl AppConfig {
    /// Load from the configured file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            Err(_) => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml_content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&yaml_content).with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Apply `ERA_DATA_DIR`, `ERA_SEED_DIR` and `ERA_BIND_ADDR` as returned by `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ERA_DATA_DIR").filter(|v| !v.is_empty()) {
            debug!("ERA_DATA_DIR override: {}", dir);
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ERA_SEED_DIR").filter(|v| !v.is_empty()) {
            debug!("ERA_SEED_DIR override: {}", dir);
            self.seed_directory = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("ERA_BIND_ADDR").filter(|v| !v.is_empty()) {
            debug!("ERA_BIND_ADDR override: {}", addr);
            self.bind_address = addr;
        }
        self
    }
}
