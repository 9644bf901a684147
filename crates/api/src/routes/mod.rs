//! HTTP route definitions.

pub mod download;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Application routes: the download request endpoint and the WebSocket
/// upgrade path. Mounted at root level to match the client wire contract.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/download", post(download::start_download))
        .route("/ws/{client_token}", get(ws::ws_handler))
}
