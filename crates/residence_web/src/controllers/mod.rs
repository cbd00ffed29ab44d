//! Request handlers grouped by surface: HTML pages, JSON API, alerts.

pub mod alerts;
pub mod api;
pub mod pages;

use crate::error::{WebError, WebResult};
use residence_core::{AlertService, AlertSummary, BuildingId, RepoError, SqliteAlertRepository};
use rusqlite::Connection;

/// Loads the header badge state rendered on every page.
pub(crate) fn alert_summary(conn: &Connection) -> WebResult<AlertSummary> {
    let service = AlertService::new(SqliteAlertRepository::try_new(conn)?);
    Ok(service.summary()?)
}

/// Runs a building mutation and records its badge alert in one transaction.
///
/// Either both writes land or neither does.
pub(crate) fn with_alert<T>(
    conn: &Connection,
    mutate: impl FnOnce(&Connection) -> WebResult<T>,
    describe: impl FnOnce(&T) -> String,
) -> WebResult<T> {
    let tx = conn.unchecked_transaction().map_err(RepoError::from)?;
    let value = mutate(&tx)?;
    let alerts = AlertService::new(SqliteAlertRepository::try_new(&tx)?);
    alerts.notify(describe(&value))?;
    tx.commit().map_err(RepoError::from)?;
    Ok(value)
}

/// Malformed ids cannot match any document, so they map to not-found.
pub(crate) fn parse_building_id(raw: &str) -> WebResult<BuildingId> {
    BuildingId::parse_str(raw).map_err(|_| WebError::NotFound(format!("building {raw}")))
}
