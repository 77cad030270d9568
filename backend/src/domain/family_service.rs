use anyhow::{Context, Result};
use log::{info, warn};

use shared::Family;

use super::commands::family::{DeleteFamilyResult, FamilyResult, UpdateFamilyCommand};
use super::error::DirectoryError;
use super::search::search_families;
use super::state::{self, SharedDirectory};
use crate::storage::{save_json, StoreHandle, FAMILIES_KEY};

/// Service for reading and editing family records
#[derive(Clone)]
pub struct FamilyService {
    store: StoreHandle,
    directory: SharedDirectory,
}

impl FamilyService {
    pub fn new(store: StoreHandle, directory: SharedDirectory) -> Self {
        Self { store, directory }
    }

    pub fn list_families(&self) -> Result<Vec<Family>> {
        let data = state::read(&self.directory)?;
        info!("Listing {} families", data.families.len());
        Ok(data.families.clone())
    }

    /// Families matching `query`; an empty query returns all of them
    pub fn search_families(&self, query: &str) -> Result<Vec<Family>> {
        let data = state::read(&self.directory)?;
        let results = search_families(query, &data.families);
        info!("Search '{}' matched {} of {} families", query, results.len(), data.families.len());
        Ok(results)
    }

    pub fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        let data = state::read(&self.directory)?;
        let family = data.families.iter().find(|family| family.id == family_id).cloned();
        if family.is_none() {
            warn!("Family not found: {}", family_id);
        }
        Ok(family)
    }

    pub fn add_family(&self, family: Family) -> Result<FamilyResult> {
        info!("Adding family: {}", family.id);

        if family.id.trim().is_empty() {
            return Err(DirectoryError::EmptyFamilyId.into());
        }

        let mut data = state::write(&self.directory)?;
        if data.families.iter().any(|existing| existing.id == family.id) {
            warn!("Refusing duplicate family id: {}", family.id);
            return Err(DirectoryError::DuplicateFamilyId(family.id).into());
        }

        let mut families = data.families.clone();
        families.push(family.clone());
        save_json(self.store.as_ref(), FAMILIES_KEY, &families).context("Failed to save families")?;
        data.families = families;

        info!("Added family {} ({} total)", family.id, data.families.len());
        Ok(FamilyResult {
            success_message: format!("Family '{}' added successfully", family.id),
            family,
        })
    }

    /// Replace the supplied top-level fields of an existing family
    pub fn update_family(&self, command: UpdateFamilyCommand) -> Result<FamilyResult> {
        info!("Updating family: {}", command.family_id);

        let mut data = state::write(&self.directory)?;
        let Some(position) = data.families.iter().position(|family| family.id == command.family_id) else {
            warn!("Cannot update missing family: {}", command.family_id);
            return Err(DirectoryError::FamilyNotFound(command.family_id).into());
        };

        let mut families = data.families.clone();
        let updated = command.apply_to(&families[position]);
        families[position] = updated.clone();
        save_json(self.store.as_ref(), FAMILIES_KEY, &families).context("Failed to save families")?;
        data.families = families;

        info!("Updated family {}", updated.id);
        Ok(FamilyResult {
            success_message: format!("Family '{}' updated successfully", updated.id),
            family: updated,
        })
    }

    /// Remove a family. Payments recorded for it are kept.
    pub fn delete_family(&self, family_id: &str) -> Result<DeleteFamilyResult> {
        info!("Deleting family: {}", family_id);

        let mut data = state::write(&self.directory)?;
        if !data.families.iter().any(|family| family.id == family_id) {
            warn!("Family {} not present, nothing to delete", family_id);
            return Ok(DeleteFamilyResult {
                deleted: false,
                success_message: format!("Family '{}' was not found", family_id),
            });
        }

        let families: Vec<Family> = data
            .families
            .iter()
            .filter(|family| family.id != family_id)
            .cloned()
            .collect();
        save_json(self.store.as_ref(), FAMILIES_KEY, &families).context("Failed to save families")?;
        data.families = families;

        info!("Deleted family {} ({} remaining)", family_id, data.families.len());
        Ok(DeleteFamilyResult {
            deleted: true,
            success_message: format!("Family '{}' deleted successfully", family_id),
        })
    }
}
