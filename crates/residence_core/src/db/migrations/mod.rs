//! Collection schema history.
//!
//! Version 1 creates the `buildings` and `residents` collections, version 2
//! adds the `alerts` feed behind the header badge. The applied version is
//! kept in `PRAGMA user_version`.

use crate::db::{DbError, DbResult, StoreTarget};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 2] = [
    Migration {
        version: 1,
        name: "buildings_residents",
        sql: include_str!("0001_buildings_residents.sql"),
    },
    Migration {
        version: 2,
        name: "alerts",
        sql: include_str!("0002_alerts.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATIONS[MIGRATIONS.len() - 1].version
}

/// Schema version recorded in the store behind `conn`; `0` for a fresh one.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`] in a single transaction.
///
/// A store already written by a newer build is left untouched.
pub(crate) fn migrate_to_latest(conn: &mut Connection, target: &StoreTarget) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew {
            target: target.clone(),
            found,
            supported,
        });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|migration| migration.version > found) {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok mode={} from_version={found} to_version={supported}",
        target.mode()
    );
    Ok(())
}
