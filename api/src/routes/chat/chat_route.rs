//! POST /chat — relays a wellness message to the model.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use tracing::{debug, instrument};
use wellness_relay::{ChatRequest, ChatResponse};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: POST /chat
///
/// Dropping the connection drops this future, which abandons the pending
/// upstream call for this request only.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"I slept for 7 hours last night and ate a healthy breakfast"}'
/// ```
#[instrument(name = "chat_route", skip(state, headers, body))]
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let response = state.relay.handle(&body).await?;
    Ok(Json(response))
}
