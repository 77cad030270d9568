//! # ERA Directory Backend
//!
//! Family directory, fee ledger and notice board for a residents' association.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API)
//!     ↓
//! Domain Layer (search, ledger, services)
//!     ↓
//! Storage Layer (KeyValueStore: JSON files, memory)
//! ```
//!
//! The domain never touches files directly; every list is persisted through
//! the injected [`storage::KeyValueStore`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::Router;
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use config::AppConfig;
use domain::{
    shared_directory, CredentialService, DirectoryService, FamilyService, FeeService, NotificationService,
};
use storage::{load_directory, JsonFileStore, SeedSnapshot, StoreHandle};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub family_service: FamilyService,
    pub fee_service: FeeService,
    pub notification_service: NotificationService,
    pub credential_service: CredentialService,
    pub directory_service: DirectoryService,
}

/// Initialize the backend from configuration: JSON file store plus seed directory
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_directory.display());
    let store: StoreHandle = Arc::new(JsonFileStore::new(&config.data_directory)?);

    info!("Reading seed snapshot from {}", config.seed_directory.display());
    let seed = SeedSnapshot::from_directory(&config.seed_directory)?;

    initialize_with_store(store, seed)
}

/// Initialize the backend over any store
pub fn initialize_with_store(store: StoreHandle, seed: SeedSnapshot) -> Result<AppState> {
    info!("Loading directory");
    let data = load_directory(store.as_ref(), &seed).context("Failed to load directory from store")?;
    info!(
        "Directory has {} families, {} fees, {} payments",
        data.families.len(),
        data.fees.len(),
        data.payments.len()
    );
    let directory = shared_directory(data);

    info!("Syncing credentials");
    let credential_service = CredentialService::new(store.clone());
    credential_service
        .sync_from_seed(&seed.credentials)
        .context("Failed to sync credentials")?;

    info!("Setting up domain services");
    Ok(AppState {
        family_service: FamilyService::new(store.clone(), directory.clone()),
        fee_service: FeeService::new(store.clone(), directory.clone()),
        notification_service: NotificationService::new(store.clone(), directory.clone()),
        credential_service,
        directory_service: DirectoryService::new(store, directory, Arc::new(seed)),
    })
}

/// Create the Axum router with all routes configured.
///
/// `allowed_origin` restricts CORS to a single origin; `None` allows any.
pub fn create_router(app_state: AppState, allowed_origin: Option<&str>) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match allowed_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {}", origin))?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    };

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .with_state(app_state))
}
