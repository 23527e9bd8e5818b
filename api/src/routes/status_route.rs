//! GET / and GET /health — liveness probes; they never touch the upstream.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
}

/// Handler: GET /
pub async fn root_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        service: Some(state.service_name),
    })
}

/// Handler: GET /health
pub async fn health_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        service: None,
    })
}
