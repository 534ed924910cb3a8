//! Network completion events delivered back to the UI loop.
//!
//! Fetches and mutations run on spawned tasks; the event loop drains these
//! through an unbounded channel and folds them into the view state.

use crate::cache::Resource;
use shared::{DeletedMemberRecord, Member};

#[derive(Debug)]
pub enum UiEvent {
    /// `generation` tags the fetch this result belongs to; the cache drops
    /// completions from superseded fetches.
    MembersLoaded {
        generation: u64,
        result: Result<Vec<Member>, String>,
    },
    HistoryLoaded {
        generation: u64,
        result: Result<Vec<DeletedMemberRecord>, String>,
    },
    /// A mutation completed; `result` carries the user-facing notice and
    /// `invalidates` declares which cached resources it touched.
    MutationFinished {
        result: Result<String, String>,
        invalidates: &'static [Resource],
    },
}
