//! Resident repository contract and SQLite implementation.
//!
//! The `building` column is not a foreign key: residents may outlive the
//! building they reference.

use crate::model::building::BuildingId;
use crate::model::resident::{Resident, ResidentId};
use crate::repo::{bool_to_int, ensure_connection_ready, parse_flag, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row};

const RESIDENT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    dob,
    contact,
    info,
    building,
    roomnumber,
    listed,
    seen,
    created_at,
    updated_at
FROM residents";

/// Repository interface for resident documents.
pub trait ResidentRepository {
    fn create(&self, resident: &Resident) -> RepoResult<ResidentId>;
    fn find_by_id(&self, id: ResidentId) -> RepoResult<Option<Resident>>;
    /// Residents referencing `building`, ordered by room number.
    fn list_for_building(&self, building: BuildingId) -> RepoResult<Vec<Resident>>;
}

/// SQLite-backed resident repository.
pub struct SqliteResidentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResidentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "residents")?;
        Ok(Self { conn })
    }
}

impl ResidentRepository for SqliteResidentRepository<'_> {
    fn create(&self, resident: &Resident) -> RepoResult<ResidentId> {
        self.conn.execute(
            "INSERT INTO residents (
                uuid,
                name,
                dob,
                contact,
                info,
                building,
                roomnumber,
                listed,
                seen
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                resident.uuid.to_string(),
                resident.name.as_str(),
                resident.dob.as_str(),
                resident.contact.as_str(),
                resident.info.as_str(),
                resident.building.map(|id| id.to_string()),
                resident.roomnumber,
                bool_to_int(resident.listed),
                bool_to_int(resident.seen),
            ],
        )?;

        Ok(resident.uuid)
    }

    fn find_by_id(&self, id: ResidentId) -> RepoResult<Option<Resident>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESIDENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resident_row(row)?));
        }

        Ok(None)
    }

    fn list_for_building(&self, building: BuildingId) -> RepoResult<Vec<Resident>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESIDENT_SELECT_SQL}
             WHERE building = ?1
             ORDER BY roomnumber ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([building.to_string()])?;
        let mut residents = Vec::new();

        while let Some(row) = rows.next()? {
            residents.push(parse_resident_row(row)?);
        }

        Ok(residents)
    }
}

fn parse_resident_row(row: &Row<'_>) -> RepoResult<Resident> {
    let uuid_text: String = row.get("uuid")?;
    let building = match row.get::<_, Option<String>>("building")? {
        Some(value) => Some(parse_uuid(&value, "residents.building")?),
        None => None,
    };

    Ok(Resident {
        uuid: parse_uuid(&uuid_text, "residents.uuid")?,
        name: row.get("name")?,
        dob: row.get("dob")?,
        contact: row.get("contact")?,
        info: row.get("info")?,
        building,
        roomnumber: row.get("roomnumber")?,
        listed: parse_flag(row.get("listed")?, "residents.listed")?,
        seen: parse_flag(row.get("seen")?, "residents.seen")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
