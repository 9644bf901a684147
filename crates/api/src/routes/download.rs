//! Handler for the `/download` endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::engine::{run_session, DownloadRequest};
use crate::error::AppResult;
use crate::response::StartedResponse;
use crate::state::AppState;

/// POST /download
///
/// Runs the download to completion, relaying progress to the client's
/// WebSocket connection, then acknowledges. 400 for validation and lookup
/// failures, 500 for runner failures; in the failure cases a `Failed`
/// event has already been pushed best-effort to the resolved connection.
pub async fn start_download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> AppResult<impl IntoResponse> {
    run_session(&state, request).await?;
    Ok(Json(StartedResponse::new()))
}
