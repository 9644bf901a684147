//! Shared helpers for tuberelay-api integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tuberelay_api::config::ServerConfig;
use tuberelay_api::router::build_app_router;
use tuberelay_api::state::AppState;
use tuberelay_api::ws::ClientRegistry;
use tuberelay_core::events::DownloadOutcome;
use tuberelay_downloader::{
    DownloadError, DownloadJob, DownloadUpdate, MediaDownloader, OnUpdate,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        download_dir: PathBuf::from("downloads"),
        ytdlp_bin: PathBuf::from("yt-dlp"),
    }
}

/// Scripted stand-in for the yt-dlp engine.
///
/// Emits the configured updates through the progress callback, then returns
/// the configured outcome. Records the URLs it was asked to download.
pub struct FakeDownloader {
    updates: Vec<DownloadUpdate>,
    outcome: Result<DownloadOutcome, DownloadError>,
    pub seen_urls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn succeeding(updates: Vec<DownloadUpdate>, outcome: DownloadOutcome) -> Self {
        Self {
            updates,
            outcome: Ok(outcome),
            seen_urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(updates: Vec<DownloadUpdate>, error: DownloadError) -> Self {
        Self {
            updates,
            outcome: Err(error),
            seen_urls: Mutex::new(Vec::new()),
        }
    }
}

impl MediaDownloader for FakeDownloader {
    fn run(
        &self,
        job: &DownloadJob,
        on_update: OnUpdate<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.seen_urls.lock().unwrap().push(job.url.clone());
        for update in &self.updates {
            on_update(*update);
        }
        match &self.outcome {
            Ok(outcome) => Ok(outcome.clone()),
            Err(err) => Err(clone_error(err)),
        }
    }
}

/// `DownloadError` has no `Clone`; rebuild the variant by hand.
fn clone_error(err: &DownloadError) -> DownloadError {
    match err {
        DownloadError::InvalidInput(m) => DownloadError::InvalidInput(m.clone()),
        DownloadError::Network(m) => DownloadError::Network(m.clone()),
        DownloadError::Extraction(m) => DownloadError::Extraction(m.clone()),
        DownloadError::Unknown(m) => DownloadError::Unknown(m.clone()),
    }
}

/// An outcome with all metadata fields populated.
pub fn sample_outcome() -> DownloadOutcome {
    DownloadOutcome {
        file_path: "downloads/clip.mp4".to_string(),
        title: Some("clip".to_string()),
        thumbnail: Some("https://i.example/t.jpg".to_string()),
        duration_seconds: Some(212.0),
    }
}

/// A downloader that emits nothing and succeeds immediately.
pub fn noop_downloader() -> Arc<FakeDownloader> {
    Arc::new(FakeDownloader::succeeding(Vec::new(), sample_outcome()))
}

/// Build the full application router with all middleware layers around the
/// given registry and downloader.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(
    registry: Arc<ClientRegistry>,
    downloader: Arc<dyn MediaDownloader>,
) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        registry,
        downloader,
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
