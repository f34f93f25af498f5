//! Agent model and legacy reference canonicalization.
//!
//! Agents are created and maintained by an external CRUD collaborator;
//! the scheduling core references them but never mutates them. Historical
//! shift data may carry the agent reference in more than one textual
//! encoding, so this module also owns the canonicalization function used
//! at the read/delete/join boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::TenantId;

/// Unique identifier for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Generates a fresh random agent identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of an agent.
///
/// This is a derived display concept maintained by the external CRUD
/// collaborator, not an authoritative scheduling constraint. The only
/// place the core consults it is the default agent pool for generation
/// (when no agents are explicitly selected, only available agents are
/// scheduled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Free to be scheduled.
    #[default]
    Available,
    /// Currently assigned to shifts.
    Scheduled,
    /// Not to be scheduled automatically.
    Unavailable,
}

/// A field agent that shifts are scheduled for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique identifier for the agent.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Hourly pay rate used by billing reports.
    pub hourly_rate: Decimal,
    /// The tenant that owns this agent.
    pub tenant_id: TenantId,
    /// Lifecycle status.
    #[serde(default)]
    pub status: AgentStatus,
}

/// Resolves any known textual encoding of an agent reference to the
/// canonical identifier.
///
/// Historical records store the agent reference as one of:
/// - the canonical hyphenated identifier,
/// - the same identifier wrapped as `ObjectId("<id>")`,
/// - the same wrapped as `new ObjectId("<id>")`.
///
/// New records are always written with the canonical form; this function
/// exists only so that reads, deletes and report joins keep matching the
/// legacy rows.
///
/// # Example
///
/// ```
/// use roster_engine::models::{canonical_agent_id, AgentId};
///
/// let id = AgentId::new();
/// let wrapped = format!("new ObjectId(\"{}\")", id);
/// assert_eq!(canonical_agent_id(&wrapped), Some(id));
/// assert_eq!(canonical_agent_id(&id.to_string()), Some(id));
/// assert_eq!(canonical_agent_id("not-an-id"), None);
/// ```
pub fn canonical_agent_id(raw: &str) -> Option<AgentId> {
    let trimmed = raw.trim();
    let unwrapped = trimmed.strip_prefix("new ").unwrap_or(trimmed);
    let inner = unwrapped
        .strip_prefix("ObjectId(\"")
        .and_then(|rest| rest.strip_suffix("\")"))
        .unwrap_or(unwrapped);
    Uuid::parse_str(inner).ok().map(AgentId)
}

/// Normalizes an agent reference for keying: the canonical identifier
/// string when the reference is recognizable, the raw text otherwise.
///
/// Two references that designate the same agent under different legacy
/// encodings normalize to the same key.
pub fn agent_ref_key(raw: &str) -> String {
    match canonical_agent_id(raw) {
        Some(id) => id.to_string(),
        None => raw.to_string(),
    }
}
