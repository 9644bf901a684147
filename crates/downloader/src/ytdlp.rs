//! `yt-dlp` subprocess driver.
//!
//! Runs the binary with a machine-readable progress template and parses its
//! stdout line stream: template-rendered lines become [`DownloadUpdate`]s,
//! and the single `--print-json` info dump at the end becomes the
//! [`DownloadOutcome`]. Non-zero exits are classified into the
//! [`DownloadError`] taxonomy from stderr content.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;
use tuberelay_core::events::DownloadOutcome;

use crate::{DownloadError, DownloadJob, DownloadUpdate, MediaDownloader, OnUpdate};

/// Line prefix marking template-rendered progress records on stdout.
const PROGRESS_PREFIX: &str = "PROGRESS:";

/// Progress template rendered by yt-dlp once per progress tick.
///
/// `%(...)j` renders each field as JSON, so missing values come out as
/// `null` instead of a placeholder string.
const PROGRESS_TEMPLATE: &str = concat!(
    "PROGRESS:",
    "{\"status\":%(progress.status)j,",
    "\"downloaded_bytes\":%(progress.downloaded_bytes)j,",
    "\"total_bytes\":%(progress.total_bytes)j,",
    "\"speed\":%(progress.speed)j}",
);

/// Configuration for the yt-dlp engine.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Binary to invoke (default `yt-dlp`; overridable for tests and
    /// packaging).
    pub binary: PathBuf,
    /// Directory downloaded files are written into.
    pub output_dir: PathBuf,
}

impl YtDlpConfig {
    /// Config using the `yt-dlp` binary from `PATH`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            output_dir,
        }
    }
}

/// Production [`MediaDownloader`] backed by the `yt-dlp` binary.
pub struct YtDlpDownloader {
    config: YtDlpConfig,
}

impl YtDlpDownloader {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }
}

/// One parsed progress-template line.
#[derive(Debug, Deserialize)]
struct ProgressLine {
    status: Option<String>,
    downloaded_bytes: Option<u64>,
    total_bytes: Option<u64>,
    speed: Option<f64>,
}

/// Subset of the yt-dlp info dump we care about.
#[derive(Debug, Deserialize)]
struct InfoJson {
    title: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    filename: Option<String>,
    /// Older yt-dlp versions report the output path under `_filename`.
    #[serde(rename = "_filename")]
    legacy_filename: Option<String>,
}

impl MediaDownloader for YtDlpDownloader {
    fn run(
        &self,
        job: &DownloadJob,
        on_update: OnUpdate<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let output_template = self.config.output_dir.join("%(title)s.%(ext)s");

        let mut child = Command::new(&self.config.binary)
            .arg("--newline")
            .arg("--no-playlist")
            .arg("--progress-template")
            .arg(PROGRESS_TEMPLATE)
            .arg("--print-json")
            .arg("--format")
            .arg("best")
            .arg("--output")
            .arg(&output_template)
            .arg(&job.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DownloadError::Unknown(format!(
                    "failed to spawn {}: {e}",
                    self.config.binary.display()
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Unknown("child stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Unknown("child stderr unavailable".to_string()))?;

        // Drain stderr on its own thread so a chatty child cannot deadlock
        // against our stdout read loop.
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            let mut stderr = stderr;
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        let mut info: Option<InfoJson> = None;
        for line in BufReader::new(stdout).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read yt-dlp stdout line");
                    break;
                }
            };

            if let Some(update) = parse_progress_line(&line) {
                on_update(update);
            } else if line.starts_with('{') {
                match serde_json::from_str::<InfoJson>(&line) {
                    Ok(parsed) => info = Some(parsed),
                    Err(e) => {
                        tracing::debug!(error = %e, "Unparseable yt-dlp info line");
                    }
                }
            }
        }

        let stderr_text = stderr_reader.join().unwrap_or_default();
        let status = child
            .wait()
            .map_err(|e| DownloadError::Unknown(format!("failed to wait for yt-dlp: {e}")))?;

        if !status.success() {
            return Err(classify_failure(&stderr_text));
        }

        let info = info.ok_or_else(|| {
            DownloadError::Extraction("yt-dlp produced no metadata".to_string())
        })?;
        let file_path = info
            .filename
            .or(info.legacy_filename)
            .ok_or_else(|| {
                DownloadError::Extraction("yt-dlp reported no output filename".to_string())
            })?;

        Ok(DownloadOutcome {
            file_path,
            title: info.title,
            thumbnail: info.thumbnail,
            duration_seconds: info.duration,
        })
    }
}

/// Parse one stdout line into a progress update, if it is one.
fn parse_progress_line(line: &str) -> Option<DownloadUpdate> {
    let payload = line.strip_prefix(PROGRESS_PREFIX)?;
    let parsed: ProgressLine = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable yt-dlp progress line");
            return None;
        }
    };

    match parsed.status.as_deref() {
        Some("downloading") => Some(DownloadUpdate::Downloading {
            downloaded_bytes: parsed.downloaded_bytes.unwrap_or(0),
            total_bytes: parsed.total_bytes,
            speed_bytes_per_sec: parsed.speed,
        }),
        Some("finished") => Some(DownloadUpdate::PostProcessing),
        _ => None,
    }
}

/// Classify a failed run from yt-dlp's stderr.
fn classify_failure(stderr: &str) -> DownloadError {
    let message = last_error_line(stderr);
    let lower = stderr.to_lowercase();

    if lower.contains("is not a valid url") || lower.contains("unsupported url") {
        DownloadError::InvalidInput(message)
    } else if lower.contains("unable to extract") {
        DownloadError::Extraction(message)
    } else if lower.contains("unable to download")
        || lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("network")
    {
        DownloadError::Network(message)
    } else {
        DownloadError::Unknown(message)
    }
}

/// Last `ERROR:` line from stderr, or the trimmed tail when there is none.
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .map(|line| line.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| {
            stderr
                .lines()
                .last()
                .unwrap_or("yt-dlp exited with an error")
                .trim()
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_downloading_line() {
        let line = r#"PROGRESS:{"status":"downloading","downloaded_bytes":512000,"total_bytes":1024000,"speed":2097152.0}"#;

        let update = parse_progress_line(line).expect("should parse");
        assert_eq!(
            update,
            DownloadUpdate::Downloading {
                downloaded_bytes: 512_000,
                total_bytes: Some(1_024_000),
                speed_bytes_per_sec: Some(2_097_152.0),
            }
        );
    }

    #[test]
    fn parses_line_with_unknown_total_and_speed() {
        let line = r#"PROGRESS:{"status":"downloading","downloaded_bytes":4096,"total_bytes":null,"speed":null}"#;

        let update = parse_progress_line(line).expect("should parse");
        assert_eq!(
            update,
            DownloadUpdate::Downloading {
                downloaded_bytes: 4096,
                total_bytes: None,
                speed_bytes_per_sec: None,
            }
        );
    }

    #[test]
    fn parses_finished_line_as_post_processing() {
        let line = r#"PROGRESS:{"status":"finished","downloaded_bytes":1024000,"total_bytes":1024000,"speed":null}"#;

        assert_eq!(
            parse_progress_line(line),
            Some(DownloadUpdate::PostProcessing)
        );
    }

    #[test]
    fn ignores_non_progress_lines() {
        assert_eq!(parse_progress_line("[download] Destination: a.mp4"), None);
        assert_eq!(parse_progress_line("PROGRESS:not json"), None);
        assert_eq!(
            parse_progress_line(r#"PROGRESS:{"status":"unknown-phase"}"#),
            None
        );
    }

    #[test]
    fn classifies_invalid_url() {
        let err = classify_failure("ERROR: 'htp://x' is not a valid URL.");
        assert!(matches!(err, DownloadError::InvalidInput(_)));

        let err = classify_failure("ERROR: Unsupported URL: https://example.com/page");
        assert!(matches!(err, DownloadError::InvalidInput(_)));
    }

    #[test]
    fn classifies_extraction_failure() {
        let err = classify_failure("ERROR: [youtube] abc: Unable to extract video data");
        assert!(matches!(err, DownloadError::Extraction(_)));
    }

    #[test]
    fn classifies_network_failure() {
        let err = classify_failure("ERROR: Unable to download webpage: The read operation timed out");
        assert!(matches!(err, DownloadError::Network(_)));
    }

    #[test]
    fn classifies_everything_else_as_unknown() {
        let err = classify_failure("ERROR: Postprocessing: ffmpeg not found");
        assert!(matches!(err, DownloadError::Unknown(_)));
    }

    #[test]
    fn error_message_comes_from_last_error_line() {
        let stderr = "WARNING: something minor\nERROR: first\nERROR: Unable to extract video data";
        assert_eq!(last_error_line(stderr), "Unable to extract video data");
    }

    #[test]
    fn error_message_falls_back_to_last_line() {
        assert_eq!(last_error_line("boom\n"), "boom");
        assert_eq!(last_error_line(""), "yt-dlp exited with an error");
    }
}
