//! Shared types for the tuberelay download relay.

pub mod events;
pub mod types;
