//! Building document model.
//!
//! # Responsibility
//! - Define the building record and its embedded room list.
//! - Own the `listed` flag semantics (active vs soft-removed).
//!
//! # Invariants
//! - `uuid` is generated once and never reused.
//! - `listed == false` means soft-removed; the record is still retrievable.
//! - `Room::details` is an unchecked reference to a resident.

use crate::model::resident::ResidentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a building document.
pub type BuildingId = Uuid;

/// One room slot inside a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room number as displayed to staff.
    pub room: u32,
    /// Occupant reference; `None` for a vacant room.
    ///
    /// Not checked against the residents collection. The referenced
    /// resident's `roomnumber` is expected, not guaranteed, to match `room`.
    #[serde(default)]
    pub details: Option<ResidentId>,
}

impl Room {
    /// Creates a vacant room.
    pub fn vacant(room: u32) -> Self {
        Self {
            room,
            details: None,
        }
    }
}

/// Builds `count` vacant rooms numbered from 1.
pub fn numbered_rooms(count: u32) -> Vec<Room> {
    (1..=count).map(Room::vacant).collect()
}

/// Persisted building document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub uuid: BuildingId,
    /// Display name; not unique.
    pub name: String,
    pub address: String,
    pub rooms: Vec<Room>,
    /// Staff head count.
    pub staff: u32,
    /// `true` while active, `false` once soft-removed.
    pub listed: bool,
    /// Unix epoch milliseconds, assigned by the store.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by the store on every write.
    pub updated_at: i64,
}

impl Building {
    /// Flags this building as soft-removed.
    pub fn soft_remove(&mut self) {
        self.listed = false;
    }

    /// Clears the soft-removed flag.
    pub fn restore(&mut self) {
        self.listed = true;
    }

    /// Returns whether the building belongs to the active listing.
    pub fn is_active(&self) -> bool {
        self.listed
    }

    /// Number of rooms with an occupant reference.
    pub fn occupied_rooms(&self) -> usize {
        self.rooms.iter().filter(|room| room.details.is_some()).count()
    }
}

/// Field set used to create a building.
///
/// The store assigns the identifier, timestamps and `listed = true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBuilding {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub staff: u32,
}

impl NewBuilding {
    pub fn new(name: impl Into<String>, address: impl Into<String>, staff: u32) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            rooms: Vec::new(),
            staff,
        }
    }

    /// Replaces the room list with `count` vacant, 1-based rooms.
    pub fn with_room_count(mut self, count: u32) -> Self {
        self.rooms = numbered_rooms(count);
        self
    }
}
