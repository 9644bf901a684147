//! Outbound event types and their wire encoding.
//!
//! The wire shapes are part of the client contract; keep them in sync with
//! the frontend's WebSocket message handling.

use serde_json::{json, Value};

/// `type` field of byte-progress and stage messages.
pub const MSG_TYPE_PROGRESS: &str = "progress";
/// `type` field of the successful terminal message.
pub const MSG_TYPE_COMPLETE: &str = "complete";
/// `type` field of the failed terminal message.
pub const MSG_TYPE_ERROR: &str = "error";

/// Speed marker shown while the source has not yet reported a transfer rate.
pub const SPEED_UNKNOWN: &str = "Calculating...";

/// Stage label shown while post-download processing (muxing, cleanup) runs.
pub const STAGE_PROCESSING: &str = "Procesando...";

/// Metadata returned by a finished download job.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DownloadOutcome {
    /// Final path of the downloaded file on disk.
    pub file_path: String,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration_seconds: Option<f64>,
}

/// One notification in a job's event stream.
///
/// A job emits zero or more `Progress`/`Stage` events followed by exactly
/// one terminal `Complete` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Byte progress, only emitted when the total size is known.
    Progress {
        /// Percentage of the transfer, in `0..=100`.
        percent: f64,
        speed_bytes_per_sec: Option<f64>,
    },
    /// A named phase with no byte progress of its own.
    Stage { label: String },
    /// Successful terminal event.
    Complete(DownloadOutcome),
    /// Failed terminal event.
    Failed { message: String },
}

impl ProgressEvent {
    /// Whether this event ends the job's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Complete(_) | ProgressEvent::Failed { .. })
    }

    /// Wire encoding pushed to the client.
    pub fn to_wire(&self) -> Value {
        match self {
            ProgressEvent::Progress {
                percent,
                speed_bytes_per_sec,
            } => json!({
                "type": MSG_TYPE_PROGRESS,
                "progress": percent,
                "speed": format_speed(*speed_bytes_per_sec),
            }),
            ProgressEvent::Stage { label } => json!({
                "type": MSG_TYPE_PROGRESS,
                "progress": 100.0,
                "status": label,
            }),
            ProgressEvent::Complete(outcome) => json!({
                "type": MSG_TYPE_COMPLETE,
                "data": {
                    "message": "Descarga completa",
                    "file_path": outcome.file_path,
                    "title": outcome.title,
                    "thumbnail": outcome.thumbnail,
                    "duration": outcome.duration_seconds,
                },
            }),
            ProgressEvent::Failed { message } => json!({
                "type": MSG_TYPE_ERROR,
                "message": message,
            }),
        }
    }
}

/// Percentage of a transfer with a known total, in `0..=100`.
pub fn percent(downloaded_bytes: u64, total_bytes: u64) -> f64 {
    if total_bytes == 0 {
        return 0.0;
    }
    downloaded_bytes as f64 / total_bytes as f64 * 100.0
}

/// Human-readable transfer rate (`"2.00 MB/s"`), or [`SPEED_UNKNOWN`] when
/// the source has not reported one yet.
pub fn format_speed(speed_bytes_per_sec: Option<f64>) -> String {
    match speed_bytes_per_sec {
        Some(bytes) if bytes > 0.0 => format!("{:.2} MB/s", bytes / (1024.0 * 1024.0)),
        _ => SPEED_UNKNOWN.to_string(),
    }
}
