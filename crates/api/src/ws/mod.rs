//! WebSocket infrastructure for relaying download progress.
//!
//! Provides the token-keyed connection registry, heartbeat monitoring, and
//! the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod registry;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use registry::{ClientHandle, ClientRegistry};
