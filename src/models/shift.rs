//! Shift model and related types.
//!
//! A shift is one scheduled work interval for one agent on one day.
//! Start and end are local wall-clock times with no timezone offset;
//! dates are plain calendar days. Duration and the overnight/24h flags
//! are derived at write time and persisted with the record.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::TenantId;
use crate::models::AgentId;

/// Unique identifier for a persisted shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub Uuid);

impl ShiftId {
    /// Generates a fresh random shift identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShiftId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Serde adapter for `HH:MM` wall-clock times.
///
/// The wire format carries times as `"08:00"`; chrono's default
/// `NaiveTime` serialization would add seconds.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    /// Serializes a time as `HH:MM`.
    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    /// Deserializes a time from `HH:MM`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A persisted shift record.
///
/// The triple (agent reference, start date, start time) is unique within
/// a tenant; the store enforces this as the sole conflict key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: ShiftId,
    /// Reference to the agent working this shift. New records always hold
    /// the canonical identifier string; historical rows may carry legacy
    /// encodings (see [`crate::models::canonical_agent_id`]).
    pub agent_id: String,
    /// The tenant that owns this shift.
    pub tenant_id: TenantId,
    /// The calendar day the shift starts on (local).
    pub date: NaiveDate,
    /// The day the shift ends on, present only when the shift spans past
    /// midnight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Start time (local wall clock).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time (local wall clock).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Elapsed hours, derived from start/end and persisted.
    pub duration_hours: Decimal,
    /// True when the shift crosses midnight (end at or before start).
    pub is_overnight: bool,
    /// True when the shift spans exactly 24 hours.
    pub is_24h: bool,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the record was first persisted.
    pub created_at: DateTime<Utc>,
}

/// One generated shift proposal for a single `(start time, agent)`
/// combination.
///
/// Candidates are what the generator produces and what the store's bulk
/// upsert consumes; they carry the agent's display name so callers can
/// render the schedule without another lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCandidate {
    /// The agent this candidate is for.
    pub agent_id: AgentId,
    /// The agent's display name at generation time.
    pub agent_name: String,
    /// The calendar day the shift starts on.
    pub date: NaiveDate,
    /// The day the shift ends on, when it differs from `date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Start time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Elapsed hours.
    pub duration_hours: Decimal,
    /// True when the shift crosses midnight.
    pub is_overnight: bool,
    /// True when the shift spans exactly 24 hours.
    pub is_24h: bool,
    /// Notes propagated from the generation request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
