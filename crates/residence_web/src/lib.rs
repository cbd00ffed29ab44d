//! HTTP surface of the residence manager.
//!
//! # Responsibility
//! - Route page, API and alert requests to their controllers.
//! - Apply the method override, request logging and static asset fallback.
//! - Open the store and serve until a shutdown signal arrives.

use std::path::Path;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::{delete, get, post, put};
use axum::{Router, ServiceExt};
use log::{error, info, warn};
use residence_core::db::{open_db, open_db_in_memory};
use rusqlite::Connection;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower::util::MapRequestLayer;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod state;
pub mod views;

use config::Config;
use controllers::{alerts, api, pages};
use error::StartupError;
use state::AppState;

/// Router wrapped in the pre-routing method override.
pub type App = tower::util::MapRequest<Router, fn(Request) -> Request>;

/// Builds the routed application without the method override.
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api_routes = Router::new()
        .route("/", get(api::example))
        .route("/todos", get(api::get_todos))
        .layer(cors);

    Router::new()
        .route("/", get(pages::index))
        .route("/removedBuildings", get(pages::removed_buildings))
        .route("/newBuilding", get(pages::new_building))
        .route("/createBuilding", post(pages::create_building))
        .route("/todo/{id}", get(pages::show))
        .route("/building/remove/{id}", put(pages::building_remove))
        .route("/building/restore/{id}", put(pages::building_restore))
        .route("/building/{id}", delete(pages::building_destroy))
        .route("/completed", get(pages::completed_page))
        .route("/alerts", delete(alerts::delete_alerts))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(state)
}

/// Builds the full application served by [`start_server`].
pub fn app(state: AppState, public_dir: &Path) -> App {
    let override_method: fn(Request) -> Request = middleware::method_override;
    MapRequestLayer::new(override_method).layer(build_router(state, public_dir))
}

/// Opens the configured store, file-backed or in-memory.
pub fn open_store(config: &Config) -> Result<Connection, StartupError> {
    let conn = if config.is_in_memory() {
        open_db_in_memory()?
    } else {
        open_db(&config.database_path)?
    };
    Ok(conn)
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> Result<(), StartupError> {
    for key in &config.defaulted {
        info!("event=config_default module=web status=ok key={key}");
    }
    for key in &config.ignored {
        warn!("event=config_ignored module=web status=error key={key} reason=connection_uri_unsupported");
    }

    info!("event=server_init module=web status=start");
    let conn = open_store(&config).map_err(|err| {
        error!("event=server_init module=web status=error error_code=store_open_failed error={err}");
        err
    })?;
    let state = AppState::new(conn);
    let app = app(state, &config.public_dir);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("event=server_listen module=web status=ok address={address}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("event=shutdown_signal module=web status=ok signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown_signal module=web status=error signal=ctrl_c error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=web status=ok signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown_signal module=web status=error signal=terminate error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
