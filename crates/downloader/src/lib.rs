//! Blocking media download execution.
//!
//! [`MediaDownloader`] is the seam between the relay core and the actual
//! fetching engine; [`YtDlpDownloader`] is the production implementation,
//! shelling out to the `yt-dlp` binary. Implementations run on a blocking
//! thread, report raw progress through a synchronous callback, and never
//! touch the client connection themselves.

mod error;
mod ytdlp;

pub use error::DownloadError;
pub use ytdlp::{YtDlpConfig, YtDlpDownloader};

use tuberelay_core::events::DownloadOutcome;

/// A single download unit of work, bound to one request at dispatch time.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Source page or media URL.
    pub url: String,
}

/// Raw progress notification produced by a running job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DownloadUpdate {
    /// Bytes are being transferred.
    Downloading {
        downloaded_bytes: u64,
        /// `None` when the source does not report a total size.
        total_bytes: Option<u64>,
        speed_bytes_per_sec: Option<f64>,
    },
    /// Transfer finished; post-processing (muxing, cleanup) is running.
    PostProcessing,
}

/// Progress callback invoked from the job's own (blocking) thread.
pub type OnUpdate<'a> = &'a (dyn Fn(DownloadUpdate) + Send + Sync);

/// Blocking download engine.
///
/// `run` blocks until the job is done, invokes `on_update` zero or more
/// times along the way, and returns exactly once. No internal retries;
/// retry policy belongs to callers.
pub trait MediaDownloader: Send + Sync {
    fn run(
        &self,
        job: &DownloadJob,
        on_update: OnUpdate<'_>,
    ) -> Result<DownloadOutcome, DownloadError>;
}
