use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tuberelay_downloader::DownloadError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Validation and lookup failures map to 400; runner failures map to 500
/// (after a best-effort `Failed` event has already been pushed to the
/// client's connection).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body is missing or has empty required fields.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No live WebSocket connection is registered for the client token.
    #[error("WebSocket connection not found")]
    ConnectionNotFound,

    /// The download job failed.
    #[error(transparent)]
    Runner(#[from] DownloadError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            AppError::ConnectionNotFound => (
                StatusCode::BAD_REQUEST,
                "CONNECTION_NOT_FOUND",
                self.to_string(),
            ),
            AppError::Runner(err) => {
                tracing::error!(error = %err, "Download job failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    runner_code(err),
                    err.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Stable error code for each runner failure class.
fn runner_code(err: &DownloadError) -> &'static str {
    match err {
        DownloadError::InvalidInput(_) => "INVALID_INPUT",
        DownloadError::Network(_) => "NETWORK_FAILURE",
        DownloadError::Extraction(_) => "EXTRACTION_FAILURE",
        DownloadError::Unknown(_) => "DOWNLOAD_FAILED",
    }
}
