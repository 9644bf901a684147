use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `3600`).
    ///
    /// The download endpoint holds the request open until the job finishes,
    /// so this must cover the longest download you expect to serve.
    pub request_timeout_secs: u64,
    /// Directory downloaded files are written into (default: `downloads`).
    pub download_dir: PathBuf,
    /// yt-dlp binary to invoke (default: `yt-dlp` from `PATH`).
    pub ytdlp_bin: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `3600`                     |
    /// | `DOWNLOAD_DIR`         | `downloads`                |
    /// | `YTDLP_BIN`            | `yt-dlp`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let download_dir =
            PathBuf::from(std::env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "downloads".into()));

        let ytdlp_bin =
            PathBuf::from(std::env::var("YTDLP_BIN").unwrap_or_else(|_| "yt-dlp".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            download_dir,
            ytdlp_bin,
        }
    }
}
