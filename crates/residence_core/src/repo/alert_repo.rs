//! Alert repository backing the header notification badge.

use crate::model::alert::Alert;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for pending alerts.
pub trait AlertRepository {
    /// Appends one alert and returns it.
    fn record(&self, message: &str) -> RepoResult<Alert>;
    /// Number of pending alerts.
    fn count(&self) -> RepoResult<u64>;
    /// Newest alerts first, at most `limit` rows.
    fn list_recent(&self, limit: u32) -> RepoResult<Vec<Alert>>;
    /// Removes every pending alert and returns how many were removed.
    fn clear_all(&self) -> RepoResult<u64>;
}

/// SQLite-backed alert repository.
pub struct SqliteAlertRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlertRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "alerts")?;
        Ok(Self { conn })
    }
}

impl AlertRepository for SqliteAlertRepository<'_> {
    fn record(&self, message: &str) -> RepoResult<Alert> {
        self.conn
            .execute("INSERT INTO alerts (message) VALUES (?1);", [message])?;
        let id = self.conn.last_insert_rowid();
        let alert = self.conn.query_row(
            "SELECT id, message, created_at FROM alerts WHERE id = ?1;",
            [id],
            |row| {
                Ok(Alert {
                    id: row.get(0)?,
                    message: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )?;
        Ok(alert)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM alerts;", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }

    fn list_recent(&self, limit: u32) -> RepoResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, message, created_at
             FROM alerts
             ORDER BY id DESC
             LIMIT ?1;",
        )?;
        let alerts = stmt
            .query_map(params![limit], |row| {
                Ok(Alert {
                    id: row.get(0)?,
                    message: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(alerts)
    }

    fn clear_all(&self) -> RepoResult<u64> {
        let removed = self.conn.execute("DELETE FROM alerts;", [])?;
        Ok(removed as u64)
    }
}
