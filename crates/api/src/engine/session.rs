//! One download request end-to-end: validate, resolve the connection, run
//! the blocking job, and always produce exactly one terminal outcome for
//! both the HTTP caller and (best-effort) the connected client.

use std::sync::Arc;

use serde::Deserialize;
use tuberelay_core::events::ProgressEvent;
use tuberelay_downloader::DownloadJob;

use crate::engine::emitter::ProgressSink;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /download`.
///
/// Fields are optional so missing keys surface as a 400 with a clear
/// message instead of a framework-level deserialization reject.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
    pub client_token: Option<String>,
}

/// Run one download session to completion.
///
/// On success the `Complete` event has already been emitted when this
/// returns; on failure a `Failed` event has been emitted best-effort if a
/// connection was resolved. Either way the caller gets exactly one result,
/// and delivery failures never escalate into it.
pub async fn run_session(state: &AppState, request: DownloadRequest) -> AppResult<()> {
    // Validating.
    let url = non_empty(request.url).ok_or_else(invalid_request)?;
    let token = non_empty(request.client_token).ok_or_else(invalid_request)?;

    // Dispatching. The connection is resolved exactly once; a connection
    // that drops during the job only makes deliveries no-ops downstream.
    let handle = state
        .registry
        .lookup(&token)
        .await
        .ok_or(AppError::ConnectionNotFound)?;

    tracing::info!(
        token = %token,
        conn_id = %handle.conn_id,
        url = %url,
        "Download dispatched",
    );

    // Running. The job blocks for the whole transfer, so it runs on the
    // blocking pool; progress flows through the sink only in this state.
    let sink = ProgressSink::new(handle);
    let job = DownloadJob { url };
    let downloader = Arc::clone(&state.downloader);
    let update_sink = sink.clone();

    let joined = tokio::task::spawn_blocking(move || {
        downloader.run(&job, &move |update| update_sink.emit_update(update))
    })
    .await;

    // Terminating: exactly one terminal event per job, best-effort.
    match joined {
        Ok(Ok(outcome)) => {
            tracing::info!(token = %token, file_path = %outcome.file_path, "Download complete");
            sink.emit(&ProgressEvent::Complete(outcome));
            Ok(())
        }
        Ok(Err(err)) => {
            sink.emit(&ProgressEvent::Failed {
                message: err.to_string(),
            });
            Err(AppError::Runner(err))
        }
        Err(join_err) => {
            let message = format!("Download task failed: {join_err}");
            sink.emit(&ProgressEvent::Failed {
                message: message.clone(),
            });
            Err(AppError::Internal(message))
        }
    }
}

fn invalid_request() -> AppError {
    AppError::InvalidRequest("url and client_token are required".to_string())
}

/// `Some` only for present, non-blank strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::non_empty;

    #[test]
    fn non_empty_rejects_missing_and_blank() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(
            non_empty(Some("https://example.com".to_string())),
            Some("https://example.com".to_string())
        );
    }
}
