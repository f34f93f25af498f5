//! Core data models for the shift scheduling engine.
//!
//! This module contains all the domain models used throughout the engine.

mod agent;
mod shift;
mod tenant;

pub use agent::{Agent, AgentId, AgentStatus, agent_ref_key, canonical_agent_id};
pub use shift::{Shift, ShiftCandidate, ShiftId, hhmm};
pub use tenant::{TenantId, TenantScope};
