use residence_core::db::migrations::{latest_version, schema_version};
use residence_core::db::{open_db, open_db_in_memory, DbError, StoreTarget};
use residence_core::{
    AlertRepository, BuildingRepository, RepoError, SqliteAlertRepository,
    SqliteBuildingRepository,
};
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

const BUILDINGS_RESIDENTS_SQL: &str =
    include_str!("../src/db/migrations/0001_buildings_residents.sql");

/// Leaves a store file exactly as the first schema release wrote it.
fn write_v1_store(path: &Path, building_id: Uuid) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(BUILDINGS_RESIDENTS_SQL).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    conn.execute(
        "INSERT INTO buildings (uuid, name, address) VALUES (?1, 'Elder Court', '9 Mill Lane');",
        [building_id.to_string()],
    )
    .unwrap();
}

#[test]
fn fresh_store_has_every_collection_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert!(SqliteBuildingRepository::try_new(&conn).is_ok());
    let alerts = SqliteAlertRepository::try_new(&conn).unwrap();
    assert_eq!(alerts.count().unwrap(), 0);
}

#[test]
fn building_inserted_with_defaults_reads_back_listed_with_no_rooms() {
    let conn = open_db_in_memory().unwrap();
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO buildings (uuid, name) VALUES (?1, 'Bare');",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteBuildingRepository::try_new(&conn).unwrap();
    let building = repo.find_by_id(id).unwrap().unwrap();
    assert!(building.listed);
    assert!(building.rooms.is_empty());
    assert_eq!(building.staff, 0);
    assert_eq!(building.address, "");
}

#[test]
fn v1_store_gains_alert_feed_and_keeps_buildings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("residence.sqlite3");
    let id = Uuid::new_v4();
    write_v1_store(&path, id);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 2);

    let buildings = SqliteBuildingRepository::try_new(&conn).unwrap();
    let kept = buildings.find_by_id(id).unwrap().unwrap();
    assert_eq!(kept.name, "Elder Court");
    assert_eq!(buildings.list_active().unwrap().len(), 1);

    let alerts = SqliteAlertRepository::try_new(&conn).unwrap();
    alerts.record("upgraded").unwrap();
    assert_eq!(alerts.count().unwrap(), 1);
}

#[test]
fn repositories_reject_store_that_was_not_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.sqlite3");
    write_v1_store(&path, Uuid::new_v4());
    let conn = Connection::open(&path).unwrap();

    let err = SqliteAlertRepository::try_new(&conn)
        .err()
        .expect("v1 store has no alert feed");
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 1,
            ..
        }
    ));
}

#[test]
fn store_from_newer_build_is_refused_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew {
            target,
            found,
            supported,
        } => {
            assert_eq!(target, StoreTarget::File(path.clone()));
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 999);
}

#[test]
fn unopenable_store_error_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("residence.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(&err, DbError::Open { target, .. } if *target == StoreTarget::File(path.clone())));
    assert!(err.to_string().contains("no-such-dir"));
}
