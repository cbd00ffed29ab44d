//! Resident document model.
//!
//! Residents are persisted and readable, but no use-case mutates them yet.
//!
//! # Invariants
//! - `building` is an unchecked reference; it may name a destroyed building.

use crate::model::building::BuildingId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a resident document.
pub type ResidentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub uuid: ResidentId,
    pub name: String,
    /// Date of birth as entered by staff; free text.
    pub dob: String,
    pub contact: String,
    pub info: String,
    pub building: Option<BuildingId>,
    pub roomnumber: u32,
    pub listed: bool,
    /// Whether staff acknowledged this resident's latest change.
    pub seen: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Resident {
    /// Creates an unplaced resident with a generated ID.
    ///
    /// Starts listed and unseen; timestamps are assigned by the store on insert.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            dob: String::new(),
            contact: String::new(),
            info: String::new(),
            building: None,
            roomnumber: 0,
            listed: true,
            seen: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Places the resident in a building room.
    pub fn placed_in(mut self, building: BuildingId, roomnumber: u32) -> Self {
        self.building = Some(building);
        self.roomnumber = roomnumber;
        self
    }
}
