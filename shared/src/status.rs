//! Derived membership status
//!
//! Status is computed from the freeze flag and the expiry date at render
//! time, never stored.

use crate::models::Member;
use chrono::{Local, NaiveDate};

/// UI-derived member status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Expired,
    Frozen,
}

impl MemberStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Expired => "Expired",
            MemberStatus::Frozen => "Frozen",
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Member {
    /// Status relative to `today`. Precedence: freeze wins, then a
    /// strictly-past expiry. An unparsable expiry date never counts as
    /// expired.
    pub fn status_on(&self, today: NaiveDate) -> MemberStatus {
        if self.freeze {
            return MemberStatus::Frozen;
        }
        match NaiveDate::parse_from_str(&self.expiry_date, "%Y-%m-%d") {
            Ok(expiry) if expiry < today => MemberStatus::Expired,
            _ => MemberStatus::Active,
        }
    }

    /// Status relative to the local current date.
    pub fn status(&self) -> MemberStatus {
        self.status_on(Local::now().date_naive())
    }
}
