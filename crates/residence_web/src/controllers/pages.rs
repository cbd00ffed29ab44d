//! HTML page controllers for the building lifecycle.
//!
//! # Responsibility
//! - Map each page route to one building operation plus a view or redirect.
//! - Record a header alert for every successful mutation, in the same
//!   transaction as the mutation itself.
//!
//! # Invariants
//! - Unknown or malformed ids render the 404 page, never a silent no-op.
//! - Mutations answer with a redirect, or with the updated document as JSON
//!   when the caller asks for `application/json`.

use crate::controllers::{alert_summary, parse_building_id, with_alert};
use crate::error::{WebError, WebResult};
use crate::state::AppState;
use crate::views::{self, ListKind};
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use residence_core::{
    Building, BuildingService, CreateBuildingRequest, ResidentService, SqliteBuildingRepository,
    SqliteResidentRepository,
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};

/// Body of the new-building form, URL-encoded or JSON.
///
/// Numeric fields arrive as text (JSON clients may send numbers); blanks
/// mean zero.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBuildingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_integer")]
    pub staff: String,
    #[serde(default, deserialize_with = "text_or_integer")]
    pub rooms: String,
}

fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrInteger {
        Text(String),
        Integer(i64),
    }

    Ok(match TextOrInteger::deserialize(deserializer)? {
        TextOrInteger::Text(text) => text,
        TextOrInteger::Integer(value) => value.to_string(),
    })
}

/// Extracts [`CreateBuildingForm`] from either a JSON or a URL-encoded body,
/// chosen by `Content-Type`.
pub struct CreateBuildingBody(pub CreateBuildingForm);

impl<S> FromRequest<S> for CreateBuildingBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"));

        let form = if is_json {
            Json::<CreateBuildingForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        } else {
            Form::<CreateBuildingForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        };
        Ok(Self(form))
    }
}

impl CreateBuildingForm {
    fn into_request(self) -> WebResult<CreateBuildingRequest> {
        Ok(CreateBuildingRequest {
            staff: parse_count("staff", &self.staff)?,
            room_count: parse_count("rooms", &self.rooms)?,
            name: self.name,
            address: self.address,
        })
    }
}

fn parse_count(field: &str, raw: &str) -> WebResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| WebError::BadRequest(format!("{field} must be a non-negative number")))
}

fn building_service(conn: &Connection) -> WebResult<BuildingService<SqliteBuildingRepository<'_>>> {
    Ok(BuildingService::new(SqliteBuildingRepository::try_new(conn)?))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn mutation_response(headers: &HeaderMap, building: Building, redirect_to: &str) -> Response {
    if wants_json(headers) {
        Json(building).into_response()
    } else {
        Redirect::to(redirect_to).into_response()
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> WebResult<Html<String>> {
    let (buildings, alerts) = state
        .with_store(|conn| Ok((building_service(conn)?.list_active()?, alert_summary(conn)?)))
        .await?;
    Ok(views::building_list(ListKind::Active, &buildings, &alerts))
}

/// `GET /removedBuildings`
pub async fn removed_buildings(State(state): State<AppState>) -> WebResult<Html<String>> {
    let (buildings, alerts) = state
        .with_store(|conn| Ok((building_service(conn)?.list_removed()?, alert_summary(conn)?)))
        .await?;
    Ok(views::building_list(ListKind::Removed, &buildings, &alerts))
}

/// `GET /newBuilding`
pub async fn new_building(State(state): State<AppState>) -> WebResult<Html<String>> {
    let alerts = state.with_store(alert_summary).await?;
    Ok(views::new_building_form(&alerts))
}

/// `POST /createBuilding`
pub async fn create_building(
    State(state): State<AppState>,
    CreateBuildingBody(form): CreateBuildingBody,
) -> WebResult<Redirect> {
    let request = form.into_request()?;
    state
        .with_store(move |conn| {
            with_alert(
                conn,
                |conn| Ok(building_service(conn)?.create_building(&request)?),
                |building: &Building| format!("Building \"{}\" created", building.name),
            )
        })
        .await?;
    Ok(Redirect::to("/"))
}

/// `GET /todo/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> WebResult<Html<String>> {
    let id = parse_building_id(&raw_id)?;
    let (building, occupancy, alerts) = state
        .with_store(move |conn| {
            let building = building_service(conn)?
                .find_by_id(id)?
                .ok_or_else(|| WebError::NotFound(format!("building {id}")))?;
            let residents = ResidentService::new(SqliteResidentRepository::try_new(conn)?);
            let occupancy = residents.room_occupancy(&building)?;
            Ok((building, occupancy, alert_summary(conn)?))
        })
        .await?;
    Ok(views::building_detail(&building, &occupancy, &alerts))
}

/// `PUT /building/remove/{id}`
pub async fn building_remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> WebResult<Response> {
    let id = parse_building_id(&raw_id)?;
    let building = state
        .with_store(move |conn| {
            with_alert(
                conn,
                |conn| Ok(building_service(conn)?.soft_remove(id)?),
                |building: &Building| format!("Building \"{}\" removed", building.name),
            )
        })
        .await?;
    Ok(mutation_response(&headers, building, "/"))
}

/// `PUT /building/restore/{id}`
pub async fn building_restore(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> WebResult<Response> {
    let id = parse_building_id(&raw_id)?;
    let building = state
        .with_store(move |conn| {
            with_alert(
                conn,
                |conn| Ok(building_service(conn)?.restore(id)?),
                |building: &Building| format!("Building \"{}\" restored", building.name),
            )
        })
        .await?;
    Ok(mutation_response(&headers, building, "/removedBuildings"))
}

/// `DELETE /building/{id}`
pub async fn building_destroy(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> WebResult<Response> {
    let id = parse_building_id(&raw_id)?;
    let building = state
        .with_store(move |conn| {
            with_alert(
                conn,
                |conn| Ok(building_service(conn)?.destroy(id)?),
                |building: &Building| format!("Building \"{}\" deleted", building.name),
            )
        })
        .await?;
    Ok(mutation_response(&headers, building, "/removedBuildings"))
}

/// `GET /completed`
pub async fn completed_page(State(state): State<AppState>) -> WebResult<Html<String>> {
    let alerts = state.with_store(alert_summary).await?;
    Ok(views::completed_page(&alerts))
}
