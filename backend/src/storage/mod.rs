//! # Storage Module
//!
//! Handles all data persistence for the directory.
//!
//! The domain never knows where its lists live. Everything it persists goes
//! through the [`KeyValueStore`] trait as whole JSON documents, one key per list:
//!
//! ```text
//! era_families_v1          -> [Family, ...]
//! era_fees_v1              -> [Fee, ...]
//! era_payments_v1          -> [Payment, ...]
//! era_notification         -> "banner text"        (absent when cleared)
//! era_credentials_v1       -> { phone: Credential }
//! era_credentials_v1_hash  -> hash of the seed copy last written
//! ```
//!
//! ## Implementations
//!
//! - **JsonFileStore**: one `<key>.json` file per key in a data directory
//! - **MemoryStore**: in-process map, used by tests and embedders
//!
//! The bundled seed snapshot (see [`seed`]) initialises any key that is missing,
//! and [`sync`] provides the hash-compare-and-overwrite used for credentials.

pub mod traits;
pub mod json_file;
pub mod memory;
pub mod seed;
pub mod sync;

#[cfg(test)]
pub mod test_utils;

pub use traits::{load_json, save_json, KeyValueStore, StoreHandle};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use seed::{load_directory, reload_directory, SeedSnapshot};
pub use sync::{data_hash, force_sync, should_sync, sync_with_storage};

pub const FAMILIES_KEY: &str = "era_families_v1";
pub const FEES_KEY: &str = "era_fees_v1";
pub const PAYMENTS_KEY: &str = "era_payments_v1";
pub const NOTIFICATION_KEY: &str = "era_notification";
pub const CREDENTIALS_KEY: &str = "era_credentials_v1";
