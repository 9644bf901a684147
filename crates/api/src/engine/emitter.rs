//! Bridge between a blocking download job and its client connection.
//!
//! The job thread calls [`ProgressSink::emit_update`] synchronously; the
//! unbounded channel behind the handle marshals each message onto the
//! connection's sender task, which preserves per-job emission order.
//! Delivery failures are logged and swallowed at this boundary -- nothing
//! here may raise back into the job.

use axum::extract::ws::Message;
use tuberelay_core::events::{percent, ProgressEvent, STAGE_PROCESSING};
use tuberelay_downloader::DownloadUpdate;

use crate::ws::ClientHandle;

/// Per-job event emitter bound to one resolved connection.
#[derive(Clone)]
pub struct ProgressSink {
    handle: ClientHandle,
}

impl ProgressSink {
    pub fn new(handle: ClientHandle) -> Self {
        Self { handle }
    }

    /// Push one event to the client, best-effort.
    ///
    /// Infallible in its external contract: a closed connection is logged
    /// at debug and otherwise ignored.
    pub fn emit(&self, event: &ProgressEvent) {
        let payload = event.to_wire().to_string();
        if self.handle.send(Message::Text(payload.into())).is_err() {
            tracing::debug!(
                token = %self.handle.token,
                conn_id = %self.handle.conn_id,
                "Dropped event for closed connection",
            );
        }
    }

    /// Translate a raw job update into at most one client event.
    ///
    /// Byte progress without a known total is not reported; no percentage
    /// can be computed for it. The finished-transfer signal becomes the
    /// processing stage at 100%.
    pub fn emit_update(&self, update: DownloadUpdate) {
        match update {
            DownloadUpdate::Downloading {
                downloaded_bytes,
                total_bytes: Some(total),
                speed_bytes_per_sec,
            } => {
                self.emit(&ProgressEvent::Progress {
                    percent: percent(downloaded_bytes, total),
                    speed_bytes_per_sec,
                });
            }
            DownloadUpdate::Downloading {
                total_bytes: None, ..
            } => {}
            DownloadUpdate::PostProcessing => {
                self.emit(&ProgressEvent::Stage {
                    label: STAGE_PROCESSING.to_string(),
                });
            }
        }
    }
}
