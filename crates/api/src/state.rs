use std::sync::Arc;

use tuberelay_downloader::MediaDownloader;

use crate::config::ServerConfig;
use crate::ws::ClientRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connections, keyed by client token.
    pub registry: Arc<ClientRegistry>,
    /// Download engine; a trait object so tests can substitute a scripted
    /// stand-in for the yt-dlp subprocess.
    pub downloader: Arc<dyn MediaDownloader>,
}
