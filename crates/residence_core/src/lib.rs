//! Core domain logic for the residence manager.
//! This crate owns the building/resident documents and their lifecycle.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::alert::Alert;
pub use model::building::{numbered_rooms, Building, BuildingId, NewBuilding, Room};
pub use model::resident::{Resident, ResidentId};
pub use repo::alert_repo::{AlertRepository, SqliteAlertRepository};
pub use repo::building_repo::{BuildingRepository, SqliteBuildingRepository};
pub use repo::resident_repo::{ResidentRepository, SqliteResidentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::alert_service::{AlertService, AlertSummary, ALERT_DROPDOWN_LIMIT};
pub use service::building_service::{BuildingService, CreateBuildingRequest};
pub use service::resident_service::{ResidentService, RoomOccupancy};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
