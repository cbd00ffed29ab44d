//! Alert badge endpoint called by `public/js/main.js`.

use crate::error::WebResult;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use residence_core::{AlertService, SqliteAlertRepository};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearAlertsResponse {
    pub cleared: u64,
}

/// `DELETE /alerts`
pub async fn delete_alerts(State(state): State<AppState>) -> WebResult<Json<ClearAlertsResponse>> {
    let cleared = state
        .with_store(|conn| {
            let service = AlertService::new(SqliteAlertRepository::try_new(conn)?);
            Ok(service.clear()?)
        })
        .await?;
    Ok(Json(ClearAlertsResponse { cleared }))
}
