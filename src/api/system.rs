use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::AppState;

/// GET /v1
/// Liveness probe kept in the shape existing monitors expect.
pub async fn welcome() -> Json<Value> {
    Json(json!({ "Welcome": "Server is running well." }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub tracked_clients: usize,
    pub categories: Vec<&'static str>,
}

/// GET /v1/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        tracked_clients: state.shared.admission.len(),
        categories: state.shared.registry.labels(),
    })
}
