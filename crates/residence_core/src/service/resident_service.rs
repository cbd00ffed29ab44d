//! Resident read-side service.
//!
//! Residents are only created by import/seed paths; no page mutates them.

use crate::model::building::{Building, BuildingId};
use crate::model::resident::{Resident, ResidentId};
use crate::repo::resident_repo::ResidentRepository;
use crate::repo::RepoResult;

/// A room joined with its resolved occupant, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub room: u32,
    pub resident: Option<Resident>,
}

pub struct ResidentService<R: ResidentRepository> {
    repo: R,
}

impl<R: ResidentRepository> ResidentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_resident(&self, resident: &Resident) -> RepoResult<ResidentId> {
        self.repo.create(resident)
    }

    pub fn get_resident(&self, id: ResidentId) -> RepoResult<Option<Resident>> {
        self.repo.find_by_id(id)
    }

    pub fn residents_of(&self, building: BuildingId) -> RepoResult<Vec<Resident>> {
        self.repo.list_for_building(building)
    }

    /// Resolves each room's `details` reference against stored residents.
    ///
    /// Dangling references resolve to `None`; they are not an error.
    pub fn room_occupancy(&self, building: &Building) -> RepoResult<Vec<RoomOccupancy>> {
        let residents = self.repo.list_for_building(building.uuid)?;
        let mut occupancy = Vec::with_capacity(building.rooms.len());

        for room in &building.rooms {
            let resident = match room.details {
                Some(id) => match residents.iter().find(|resident| resident.uuid == id) {
                    Some(found) => Some(found.clone()),
                    None => self.repo.find_by_id(id)?,
                },
                None => None,
            };
            occupancy.push(RoomOccupancy {
                room: room.room,
                resident,
            });
        }

        Ok(occupancy)
    }
}
