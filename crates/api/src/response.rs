//! Shared response types for API handlers.

use serde::Serialize;

/// Acknowledgment body returned once a download request has run to
/// completion: `{ "message": "started" }`.
#[derive(Debug, Serialize)]
pub struct StartedResponse {
    pub message: &'static str,
}

impl StartedResponse {
    pub fn new() -> Self {
        Self { message: "started" }
    }
}

impl Default for StartedResponse {
    fn default() -> Self {
        Self::new()
    }
}
