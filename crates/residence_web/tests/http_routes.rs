use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use residence_core::db::{open_db, open_db_in_memory};
use residence_core::{Building, BuildingRepository, NewBuilding, SqliteBuildingRepository};
use residence_web::state::AppState;
use residence_web::{app, App};
use serde_json::Value;
use std::path::Path;
use tower::ServiceExt;
use uuid::Uuid;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn public_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/public"))
}

fn seeded_app(names: &[&str]) -> (App, Vec<Building>) {
    let conn = open_db_in_memory().unwrap();
    let buildings = {
        let repo = SqliteBuildingRepository::try_new(&conn).unwrap();
        names
            .iter()
            .map(|name| {
                repo.create(&NewBuilding::new(*name, "1 High Street", 2).with_room_count(2))
                    .unwrap()
            })
            .collect::<Vec<_>>()
    };
    (app(AppState::new(conn), public_dir()), buildings)
}

async fn send(app: &App, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_method(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn create_then_index_lists_building_exactly_once() {
    let (app, _) = seeded_app(&[]);

    let create = Request::builder()
        .method("POST")
        .uri("/createBuilding")
        .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from("name=Maple+House&address=1+Elm+Road&staff=2&rooms=3"))
        .unwrap();
    let response = send(&app, create).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = body_text(send(&app, get("/")).await).await;
    assert_eq!(page.matches("data-building-id=").count(), 1);
    assert_eq!(page.matches(">Maple House</a>").count(), 1);
    assert!(page.contains("<td>3</td>"));
}

#[tokio::test]
async fn create_with_non_numeric_staff_is_rejected() {
    let (app, _) = seeded_app(&[]);

    let create = Request::builder()
        .method("POST")
        .uri("/createBuilding")
        .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from("name=Oak&address=2+Elm&staff=lots"))
        .unwrap();
    let response = send(&app, create).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = body_text(send(&app, get("/")).await).await;
    assert!(page.contains("No buildings yet"));
}

#[tokio::test]
async fn create_accepts_json_body() {
    let (app, _) = seeded_app(&[]);

    for body in [
        r#"{"name":"A","address":"X","staff":"1","rooms":"0"}"#,
        r#"{"name":"B","address":"Y","staff":4,"rooms":2}"#,
    ] {
        let create = Request::builder()
            .method("POST")
            .uri("/createBuilding")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = send(&app, create).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let page = body_text(send(&app, get("/")).await).await;
    assert!(page.contains(">A</a>"));
    assert!(page.contains(">B</a>"));
    assert_eq!(page.matches("data-building-id=").count(), 2);
}

#[tokio::test]
async fn soft_remove_moves_building_to_removed_page() {
    let (app, buildings) = seeded_app(&["Keep", "Gone"]);
    let gone = &buildings[1];

    let response = send(
        &app,
        with_method("PUT", &format!("/building/remove/{}", gone.uuid)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let index = body_text(send(&app, get("/")).await).await;
    assert!(index.contains(">Keep</a>"));
    assert!(!index.contains(">Gone</a>"));

    let removed = body_text(send(&app, get("/removedBuildings")).await).await;
    assert!(removed.contains(">Gone</a>"));
    assert!(!removed.contains(">Keep</a>"));
}

#[tokio::test]
async fn html_form_override_routes_post_to_put_and_delete() {
    let (app, buildings) = seeded_app(&["Target"]);
    let id = buildings[0].uuid;

    let response = send(
        &app,
        with_method("POST", &format!("/building/remove/{id}?_method=PUT")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(
        &app,
        with_method("POST", &format!("/building/{id}?_method=DELETE")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/removedBuildings");

    let response = send(&app, get(&format!("/todo/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeated_soft_remove_keeps_building_removed() {
    let (app, buildings) = seeded_app(&["Twice"]);
    let uri = format!("/building/remove/{}", buildings[0].uuid);

    for _ in 0..2 {
        let response = send(&app, with_method("PUT", &uri)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    let removed = body_text(send(&app, get("/removedBuildings")).await).await;
    assert_eq!(removed.matches(">Twice</a>").count(), 1);
    let index = body_text(send(&app, get("/")).await).await;
    assert!(!index.contains(">Twice</a>"));
}

#[tokio::test]
async fn percent_encoded_override_key_reaches_put_route() {
    let (app, buildings) = seeded_app(&["Encoded"]);
    let id = buildings[0].uuid;

    let response = send(
        &app,
        with_method("POST", &format!("/building/remove/{id}?%5Fmethod=PUT")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let removed = body_text(send(&app, get("/removedBuildings")).await).await;
    assert!(removed.contains(">Encoded</a>"));
}

#[tokio::test]
async fn removal_is_rolled_back_when_its_alert_cannot_be_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("residence.sqlite3");
    let served = open_db(&path).unwrap();
    let building = SqliteBuildingRepository::try_new(&served)
        .unwrap()
        .create(&NewBuilding::new("Fragile", "3 Quay", 1))
        .unwrap();
    let app = app(AppState::new(served), public_dir());

    let inspector = open_db(&path).unwrap();
    inspector.execute_batch("DROP TABLE alerts;").unwrap();

    let response = send(
        &app,
        with_method("PUT", &format!("/building/remove/{}", building.uuid)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let repo = SqliteBuildingRepository::try_new(&inspector).unwrap();
    let unchanged = repo.find_by_id(building.uuid).unwrap().unwrap();
    assert!(unchanged.listed);
}

#[tokio::test]
async fn restore_returns_building_to_index() {
    let (app, buildings) = seeded_app(&["Back"]);
    let id = buildings[0].uuid;

    send(&app, with_method("PUT", &format!("/building/remove/{id}"))).await;
    let response = send(&app, with_method("PUT", &format!("/building/restore/{id}"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/removedBuildings");

    let index = body_text(send(&app, get("/")).await).await;
    assert!(index.contains(">Back</a>"));
}

#[tokio::test]
async fn remove_answers_json_when_requested() {
    let (app, buildings) = seeded_app(&["Json"]);
    let id = buildings[0].uuid;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/building/remove/{id}"))
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["uuid"], id.to_string());
    assert_eq!(json["listed"], false);
    assert_eq!(json["rooms"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn unknown_and_malformed_ids_render_not_found() {
    let (app, buildings) = seeded_app(&["Bystander"]);
    let missing = Uuid::new_v4();

    for request in [
        get(&format!("/todo/{missing}")),
        get("/todo/not-a-uuid"),
        with_method("PUT", &format!("/building/remove/{missing}")),
        with_method("PUT", &format!("/building/restore/{missing}")),
        with_method("DELETE", &format!("/building/{missing}")),
    ] {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let page = body_text(send(&app, get(&format!("/todo/{}", buildings[0].uuid))).await).await;
    assert!(page.contains("Bystander"));
    assert!(page.contains("Active"));
}

#[tokio::test]
async fn detail_page_lists_rooms() {
    let (app, buildings) = seeded_app(&["Rooms"]);

    let response = send(&app, get(&format!("/todo/{}", buildings[0].uuid))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert_eq!(page.matches("Vacant").count(), 2);
}

#[tokio::test]
async fn delete_alerts_clears_badge_counter() {
    let (app, buildings) = seeded_app(&["Alerted"]);

    send(
        &app,
        with_method("PUT", &format!("/building/remove/{}", buildings[0].uuid)),
    )
    .await;
    let page = body_text(send(&app, get("/completed")).await).await;
    assert!(page.contains("<span class=\"badge-counter\">1</span>"));

    let response = send(&app, with_method("DELETE", "/alerts")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["cleared"], 1);

    let page = body_text(send(&app, get("/completed")).await).await;
    assert!(page.contains("<span class=\"badge-counter\">0</span>"));
}

#[tokio::test]
async fn static_pages_render() {
    let (app, _) = seeded_app(&[]);

    let form = body_text(send(&app, get("/newBuilding")).await).await;
    assert!(form.contains("action=\"/createBuilding\""));

    let response = send(&app, get("/completed")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_returns_placeholder_json_with_cors() {
    let (app, _) = seeded_app(&[]);

    let request = Request::builder()
        .uri("/api")
        .header(header::ORIGIN, "http://example.test")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert_eq!(body_json(response).await["message"], "residence api");

    let todos = body_json(send(&app, get("/api/todos")).await).await;
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 3);
    assert!(todos.iter().all(|todo| todo["title"].is_string()));
}

#[tokio::test]
async fn pages_outside_api_carry_no_cors_headers() {
    let (app, _) = seeded_app(&[]);

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://example.test")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn client_script_is_served_from_public_dir() {
    let (app, _) = seeded_app(&[]);

    let response = send(&app, get("/js/main.js")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/alerts"));

    let response = send(&app, get("/missing.js")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
