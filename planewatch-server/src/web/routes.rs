//! REST API route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::finder::{self, FindRequest};
use crate::web::AppState;

/// GET /api/find: one find pass, same as `planewatch find`.
pub async fn api_find(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let request = FindRequest {
        airport: state.airport.code.clone(),
        bbox: state.bbox,
        lookback_secs: state.lookback_secs,
        now: finder::unix_now(),
    };

    match finder::find_planes(state.source.as_ref(), &state.pipeline, &request).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            warn!("find failed: {e}");
            (StatusCode::BAD_GATEWAY, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

/// GET /api/config: airport, bounding box, and classifier thresholds.
pub async fn api_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "airport": {
            "code": state.airport.code,
            "name": state.airport.name,
        },
        "bbox": state.bbox,
        "center": state.bbox.center(),
        "classifier": state.pipeline.filter.config,
        "lookback_secs": state.lookback_secs,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
