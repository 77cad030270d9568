//! # Domain Module
//!
//! Business logic for the residents' association directory.
//!
//! ## Module Organization
//!
//! - **search**: free-text family search over both scripts
//! - **ledger**: per-family fee breakdown and payment bookkeeping
//! - **report**: consolidated fee report and its CSV export
//! - **credentials**: offline password issuance keyed by phone number
//! - **state**: the in-memory lists shared by all services
//! - **\*_service**: operations over the shared lists that persist their results
//!
//! The pure modules take the lists they need as arguments and return new lists.
//! Services own the shared copy: each mutation computes the new list under the
//! write lock, saves it through the store, and only then swaps it in.

pub mod commands;
pub mod credentials;
pub mod error;
pub mod ledger;
pub mod report;
pub mod search;
pub mod state;

pub mod credential_service;
pub mod directory_service;
pub mod family_service;
pub mod fee_service;
pub mod notification_service;

pub use credential_service::CredentialService;
pub use directory_service::DirectoryService;
pub use error::DirectoryError;
pub use family_service::FamilyService;
pub use fee_service::FeeService;
pub use notification_service::NotificationService;
pub use state::{shared_directory, DirectoryData, SharedDirectory};
