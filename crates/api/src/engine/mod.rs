//! Download session orchestration.
//!
//! The per-request session controller and the bridge that carries progress
//! from the blocking job thread onto the client connection.

pub mod emitter;
pub mod session;

pub use emitter::ProgressSink;
pub use session::{run_session, DownloadRequest};
