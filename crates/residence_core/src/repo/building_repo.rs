//! Building repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/soft-remove/restore/destroy over `buildings`.
//! - Store the embedded room list as a JSON document column.
//!
//! # Invariants
//! - Listings filter on `listed` exactly: active and removed are disjoint
//!   and together cover every stored building.
//! - Listings are ordered by insertion (`created_at ASC, rowid ASC`).
//! - Every operation is an independent write; concurrent updates of the same
//!   document are last-write-wins.

use crate::model::building::{Building, BuildingId, NewBuilding, Room};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const BUILDING_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    address,
    rooms,
    staff,
    listed,
    created_at,
    updated_at
FROM buildings";

/// Repository interface for building documents.
pub trait BuildingRepository {
    /// Inserts a new listed building and returns the stored document.
    fn create(&self, fields: &NewBuilding) -> RepoResult<Building>;
    /// Returns every building with `listed == true`.
    fn list_active(&self) -> RepoResult<Vec<Building>>;
    /// Returns every building with `listed == false`.
    fn list_removed(&self) -> RepoResult<Vec<Building>>;
    /// Sets `listed = false`. Repeating the call is harmless.
    fn soft_remove(&self, id: BuildingId) -> RepoResult<Building>;
    /// Sets `listed = true`.
    fn restore(&self, id: BuildingId) -> RepoResult<Building>;
    /// Permanently deletes the building and returns its last state.
    fn destroy(&self, id: BuildingId) -> RepoResult<Building>;
    /// Loads one building regardless of its `listed` flag.
    fn find_by_id(&self, id: BuildingId) -> RepoResult<Option<Building>>;
}

/// SQLite-backed building repository.
pub struct SqliteBuildingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBuildingRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "buildings")?;
        Ok(Self { conn })
    }

    fn list_by_listed(&self, listed: bool) -> RepoResult<Vec<Building>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BUILDING_SELECT_SQL}
             WHERE listed = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(listed)])?;
        let mut buildings = Vec::new();

        while let Some(row) = rows.next()? {
            buildings.push(parse_building_row(row)?);
        }

        Ok(buildings)
    }

    fn set_listed(&self, id: BuildingId, listed: bool) -> RepoResult<Building> {
        let changed = self.conn.execute(
            "UPDATE buildings
             SET
                listed = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![bool_to_int(listed), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }
}

impl BuildingRepository for SqliteBuildingRepository<'_> {
    fn create(&self, fields: &NewBuilding) -> RepoResult<Building> {
        let id = Uuid::new_v4();
        let rooms = rooms_to_document(&fields.rooms)?;

        self.conn.execute(
            "INSERT INTO buildings (
                uuid,
                name,
                address,
                rooms,
                staff,
                listed
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1);",
            params![
                id.to_string(),
                fields.name.as_str(),
                fields.address.as_str(),
                rooms,
                fields.staff,
            ],
        )?;

        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    fn list_active(&self) -> RepoResult<Vec<Building>> {
        self.list_by_listed(true)
    }

    fn list_removed(&self) -> RepoResult<Vec<Building>> {
        self.list_by_listed(false)
    }

    fn soft_remove(&self, id: BuildingId) -> RepoResult<Building> {
        self.set_listed(id, false)
    }

    fn restore(&self, id: BuildingId) -> RepoResult<Building> {
        self.set_listed(id, true)
    }

    fn destroy(&self, id: BuildingId) -> RepoResult<Building> {
        // Loaded first so a document that no longer parses is never deleted.
        let existing = self.find_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        let changed = self
            .conn
            .execute("DELETE FROM buildings WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(existing)
    }

    fn find_by_id(&self, id: BuildingId) -> RepoResult<Option<Building>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BUILDING_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(parse_building_row(row)?));
        }

        Ok(None)
    }
}

fn rooms_to_document(rooms: &[Room]) -> RepoResult<String> {
    serde_json::to_string(rooms)
        .map_err(|err| RepoError::InvalidData(format!("unserializable room list: {err}")))
}

fn parse_building_row(row: &Row<'_>) -> RepoResult<Building> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "buildings.uuid")?;

    let rooms_text: String = row.get("rooms")?;
    let rooms: Vec<Room> = serde_json::from_str(&rooms_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid room list for building {uuid}: {err}"))
    })?;

    Ok(Building {
        uuid,
        name: row.get("name")?,
        address: row.get("address")?,
        rooms,
        staff: row.get("staff")?,
        listed: parse_flag(row.get("listed")?, "buildings.listed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
