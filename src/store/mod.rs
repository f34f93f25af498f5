//! Persistence boundary for the shift scheduling engine.
//!
//! In-memory stores with the semantics of the production storage engine:
//! a uniqueness constraint per (agent, day, start time, tenant), tenant
//! scoping enforced at the boundary, idempotent bulk upsert with an
//! explicit non-transactional fallback, and service-level cascade
//! cleanup.

mod agents;
mod cascade;
mod shifts;

pub use agents::AgentStore;
pub use cascade::{CascadeCleaner, CleanupOutcome};
pub use shifts::{BulkUpsertOutcome, CreateOutcome, NewShift, ShiftEdit, ShiftQuery, ShiftStore};
