//! Gym Client - HTTP data access for the remote member store
//!
//! Thin wrapper over the REST data service exposing the `members` and
//! `deleteHistory` collections. The two-step delete/restore operations are
//! made compensating here so callers never observe a half-applied move.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::MemberService;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{DeletedMemberRecord, Member, MemberPayload};
