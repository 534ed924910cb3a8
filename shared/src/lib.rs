//! Shared types for GymDesk
//!
//! Data models, derived-status logic and payload validation used by both
//! the data-access client and the terminal front-end.

pub mod models;
pub mod status;

// Re-exports
pub use models::{
    DeletedMemberPayload, DeletedMemberRecord, Member, MemberPayload, MembershipType,
    ValidationError, TRAINERS,
};
pub use status::MemberStatus;
