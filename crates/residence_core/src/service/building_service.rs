//! Building use-case service.
//!
//! # Responsibility
//! - Provide the create/list/soft-remove/restore/destroy entry points used
//!   by page controllers.
//! - Emit metadata-only lifecycle events.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Soft-remove and destroy are independent; neither cascades to residents.

use crate::model::building::{Building, BuildingId, NewBuilding};
use crate::repo::building_repo::BuildingRepository;
use crate::repo::RepoResult;
use log::info;

/// Request model for the create-building form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBuildingRequest {
    pub name: String,
    pub address: String,
    pub staff: u32,
    /// Number of vacant rooms to generate, numbered from 1.
    pub room_count: u32,
}

/// Use-case service wrapper for building operations.
pub struct BuildingService<R: BuildingRepository> {
    repo: R,
}

impl<R: BuildingRepository> BuildingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a listed building with generated vacant rooms.
    ///
    /// # Contract
    /// - No validation beyond field typing; empty names are accepted.
    /// - Returns the stored document with its generated ID.
    pub fn create_building(&self, request: &CreateBuildingRequest) -> RepoResult<Building> {
        let fields = NewBuilding::new(request.name.trim(), request.address.trim(), request.staff)
            .with_room_count(request.room_count);
        self.create(&fields)
    }

    /// Creates a building from a prepared field set.
    pub fn create(&self, fields: &NewBuilding) -> RepoResult<Building> {
        let building = self.repo.create(fields)?;
        info!(
            "event=building_create module=service status=ok building_id={} rooms={}",
            building.uuid,
            building.rooms.len()
        );
        Ok(building)
    }

    pub fn list_active(&self) -> RepoResult<Vec<Building>> {
        self.repo.list_active()
    }

    pub fn list_removed(&self) -> RepoResult<Vec<Building>> {
        self.repo.list_removed()
    }

    /// Soft-removes a building. Idempotent.
    ///
    /// Returns `RepoError::NotFound` for unknown IDs.
    pub fn soft_remove(&self, id: BuildingId) -> RepoResult<Building> {
        let building = self.repo.soft_remove(id)?;
        info!("event=building_soft_remove module=service status=ok building_id={id}");
        Ok(building)
    }

    /// Moves a soft-removed building back to the active listing.
    pub fn restore(&self, id: BuildingId) -> RepoResult<Building> {
        let building = self.repo.restore(id)?;
        info!("event=building_restore module=service status=ok building_id={id}");
        Ok(building)
    }

    /// Permanently deletes a building, listed or not.
    ///
    /// Residents that reference the building are left untouched.
    pub fn destroy(&self, id: BuildingId) -> RepoResult<Building> {
        let building = self.repo.destroy(id)?;
        info!("event=building_destroy module=service status=ok building_id={id}");
        Ok(building)
    }

    pub fn find_by_id(&self, id: BuildingId) -> RepoResult<Option<Building>> {
        self.repo.find_by_id(id)
    }
}
