//! Web server: map page plus a small JSON API over the finder.
//!
//! Shared state holds the flight source, the pipeline, and the airport
//! settings. Nothing is cached; every `/api/find` call hits the source.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use planewatch_core::config::AirportConfig;
use planewatch_core::types::BoundingBox;
use planewatch_core::Pipeline;

use crate::source::FlightSource;

pub mod pages;
pub mod routes;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub source: Arc<dyn FlightSource>,
    pub pipeline: Pipeline,
    pub airport: AirportConfig,
    pub bbox: BoundingBox,
    pub lookback_secs: u64,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", axum::routing::get(pages::page_index))
        .route("/api/find", axum::routing::get(routes::api_find))
        .route("/api/config", axum::routing::get(routes::api_config))
        .with_state(state)
        .layer(cors)
}

/// Start the web server.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("planewatch listening on http://{addr}");
    axum::serve(listener, app).await
}
