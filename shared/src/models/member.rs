//! Member Model

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Fixed trainer roster offered by the edit form and enforced on submission.
pub const TRAINERS: [&str; 4] = [
    "Sarah Johnson",
    "David Kim",
    "Emma Wilson",
    "Mike Thompson",
];

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipType {
    Normal,
    Premium,
    #[serde(rename = "VIP")]
    Vip,
}

impl MembershipType {
    /// All tiers, in selector order
    pub const ALL: [MembershipType; 3] = [
        MembershipType::Normal,
        MembershipType::Premium,
        MembershipType::Vip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Normal => "Normal",
            MembershipType::Premium => "Premium",
            MembershipType::Vip => "VIP",
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Unknown trainer: {0}")]
    UnknownTrainer(String),
}

/// Member entity (active collection)
///
/// `id` is assigned by the data service and stable across the member's
/// active life. Dates stay in their ISO wire form; status is derived, not
/// stored (see [`crate::status`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: String,
    pub membership_type: MembershipType,
    pub expiry_date: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub trainer: Option<String>,
    pub freeze: bool,
    pub guest_passes: u32,
}

impl Member {
    /// Stringified field values, used by the list view's any-field search.
    pub fn searchable_values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.join_date.clone(),
            self.membership_type.to_string(),
            self.expiry_date.clone(),
            self.trainer.clone().unwrap_or_default(),
            self.freeze.to_string(),
            self.guest_passes.to_string(),
        ]
    }

    /// Case-insensitive any-field substring match. The empty query matches
    /// every member.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.searchable_values()
            .iter()
            .any(|v| v.to_lowercase().contains(&needle))
    }

    /// Full field set without the id, for update or re-creation.
    pub fn to_payload(&self) -> MemberPayload {
        MemberPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            join_date: self.join_date.clone(),
            membership_type: self.membership_type,
            expiry_date: self.expiry_date.clone(),
            trainer: self.trainer.clone(),
            freeze: self.freeze,
            guest_passes: self.guest_passes,
        }
    }
}

/// Create/update payload: the full member field set, no id.
///
/// Updates are full replacements, so create and update share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: String,
    pub membership_type: MembershipType,
    pub expiry_date: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub trainer: Option<String>,
    pub freeze: bool,
    pub guest_passes: u32,
}

impl MemberPayload {
    /// Validate required fields, date formats and the trainer roster.
    ///
    /// The membership tier is closed by the enum and needs no check here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::Required("phone"));
        }
        validate_date("joinDate", &self.join_date)?;
        validate_date("expiryDate", &self.expiry_date)?;
        if let Some(trainer) = &self.trainer {
            if !TRAINERS.contains(&trainer.as_str()) {
                return Err(ValidationError::UnknownTrainer(trainer.clone()));
            }
        }
        Ok(())
    }
}

fn validate_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })?;
    Ok(())
}

/// Archival copy of a deleted member.
///
/// `id` addresses the history collection; `member_id` preserves the id the
/// member had while active. Restore replays the member fields and the
/// service assigns a fresh member id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMemberRecord {
    pub id: i64,
    pub member_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub join_date: String,
    pub membership_type: MembershipType,
    pub expiry_date: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub trainer: Option<String>,
    pub freeze: bool,
    pub guest_passes: u32,
    pub deletion_date: String,
}

impl DeletedMemberRecord {
    /// Replay the member fields for restore. History id and deletion date
    /// are dropped; the service assigns a new member id.
    pub fn to_payload(&self) -> MemberPayload {
        MemberPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            join_date: self.join_date.clone(),
            membership_type: self.membership_type,
            expiry_date: self.expiry_date.clone(),
            trainer: self.trainer.clone(),
            freeze: self.freeze,
            guest_passes: self.guest_passes,
        }
    }
}

/// POST body for the history collection: the member's own id, its full
/// field set, and the deletion timestamp stamped at delete time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMemberPayload {
    pub member_id: i64,
    #[serde(flatten)]
    pub member: MemberPayload,
    pub deletion_date: String,
}

/// The data service stores "no trainer" as an empty string.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
