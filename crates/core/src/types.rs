/// Opaque client-supplied identifier correlating a WebSocket connection
/// with download requests.
pub type ClientToken = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
