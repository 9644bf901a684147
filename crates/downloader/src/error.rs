/// Failure taxonomy for a download job.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Malformed or unsupported source URL.
    #[error("Invalid or unsupported URL: {0}")]
    InvalidInput(String),

    /// Transient network I/O failure.
    #[error("Network failure: {0}")]
    Network(String),

    /// Source metadata could not be extracted.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Any other failure, wrapping the underlying message.
    #[error("Download failed: {0}")]
    Unknown(String),
}
