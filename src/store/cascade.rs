//! Cascade deletion and orphan sweeping.
//!
//! When an agent is removed, its shifts must go with it. The cascade is
//! an explicit service invoked by the deletion handler after the agent
//! record is gone — the agent deletion stands even if dependent cleanup
//! falls short, and the outcome reports what was actually removed.
//!
//! The sweep that follows is a self-healing net for data left
//! inconsistent by partial prior failures: any shift whose agent
//! reference no longer designates a live agent (in any known encoding,
//! or in none) is removed. It also runs standalone as a maintenance
//! operation.

use std::sync::Arc;

use tracing::debug;

use crate::models::{AgentId, TenantScope};

use super::agents::AgentStore;
use super::shifts::ShiftStore;

/// Counts of records removed by a cascade run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    /// Shifts removed because they referenced the deleted agent.
    pub cascade_removed: u64,
    /// Shifts removed by the follow-up orphan sweep.
    pub orphans_removed: u64,
}

impl CleanupOutcome {
    /// Total shifts removed by the run.
    pub fn total(&self) -> u64 {
        self.cascade_removed + self.orphans_removed
    }
}

/// Removes the dependent shifts of deleted agents.
#[derive(Debug, Clone)]
pub struct CascadeCleaner {
    shifts: Arc<ShiftStore>,
    agents: Arc<AgentStore>,
}

impl CascadeCleaner {
    /// Creates a cleaner over the given stores.
    pub fn new(shifts: Arc<ShiftStore>, agents: Arc<AgentStore>) -> Self {
        Self { shifts, agents }
    }

    /// Deletes every shift referencing `agent` within `scope`, then runs
    /// the orphan sweep in the same scope.
    ///
    /// Matching covers all known reference encodings, so no shift of the
    /// deleted agent survives regardless of how its reference was
    /// written.
    pub async fn remove_agent_shifts(
        &self,
        scope: &TenantScope,
        agent: AgentId,
    ) -> CleanupOutcome {
        let cascade_removed = self.shifts.remove_matching_agent(scope, agent).await;
        let orphans_removed = self.sweep_orphans(scope).await;
        debug!(
            agent = %agent,
            cascade_removed,
            orphans_removed,
            "agent cascade complete"
        );
        CleanupOutcome {
            cascade_removed,
            orphans_removed,
        }
    }

    /// Deletes every shift in `scope` whose agent reference designates no
    /// currently existing agent. Returns the number removed.
    pub async fn sweep_orphans(&self, scope: &TenantScope) -> u64 {
        let live = self.agents.ids(scope).await;
        let removed = self.shifts.remove_orphans(scope, &live).await;
        if removed > 0 {
            debug!(removed, "orphan sweep removed dangling shifts");
        }
        removed
    }
}
