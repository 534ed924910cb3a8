//! Data models
//!
//! Shared between gym-client and the TUI front-end. Wire field names are
//! camelCase to match the remote data service; all IDs are `i64` assigned
//! by the service.

pub mod member;

// Re-exports
pub use member::*;
