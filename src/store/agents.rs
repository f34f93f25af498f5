//! Agent source.
//!
//! Agents are owned by an external CRUD collaborator; this store is the
//! scheduling core's read/delete view of them. Listing is tenant-scoped
//! and optionally narrowed to selected identifiers; deletion is what
//! triggers the shift cascade (driven by the deletion handler, not by a
//! hook in here).

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{Agent, AgentId, AgentStatus, TenantScope};

/// In-memory agent store.
#[derive(Debug, Default)]
pub struct AgentStore {
    rows: RwLock<HashMap<AgentId, Agent>>,
}

impl AgentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) an agent record. Seeding path for the
    /// external agent CRUD.
    pub async fn insert(&self, agent: Agent) -> Agent {
        let mut rows = self.rows.write().await;
        rows.insert(agent.id, agent.clone());
        agent
    }

    /// Returns every agent visible in `scope`, sorted by name.
    pub async fn all(&self, scope: &TenantScope) -> Vec<Agent> {
        let rows = self.rows.read().await;
        let mut agents: Vec<Agent> = rows
            .values()
            .filter(|a| scope.permits(a.tenant_id))
            .cloned()
            .collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Returns the agents a generation request schedules for, sorted by
    /// name.
    ///
    /// With explicit `selected` identifiers, exactly those agents (that
    /// exist in scope) are returned. With an empty selection the pool
    /// defaults to every available agent in scope.
    pub async fn candidates(&self, scope: &TenantScope, selected: &[AgentId]) -> Vec<Agent> {
        let rows = self.rows.read().await;
        let wanted: HashSet<AgentId> = selected.iter().copied().collect();
        let mut agents: Vec<Agent> = rows
            .values()
            .filter(|a| scope.permits(a.tenant_id))
            .filter(|a| {
                if wanted.is_empty() {
                    a.status == AgentStatus::Available
                } else {
                    wanted.contains(&a.id)
                }
            })
            .cloned()
            .collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Looks up one agent within the caller's scope.
    pub async fn get(&self, scope: &TenantScope, id: AgentId) -> Option<Agent> {
        let rows = self.rows.read().await;
        rows.get(&id)
            .filter(|a| scope.permits(a.tenant_id))
            .cloned()
    }

    /// The identifiers of every agent visible in `scope`. Input to the
    /// orphan sweep.
    pub async fn ids(&self, scope: &TenantScope) -> Vec<AgentId> {
        let rows = self.rows.read().await;
        rows.values()
            .filter(|a| scope.permits(a.tenant_id))
            .map(|a| a.id)
            .collect()
    }

    /// Deletes one agent within the caller's scope and returns it.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] when the agent does not exist or is
    /// outside the caller's scope.
    pub async fn delete(&self, scope: &TenantScope, id: AgentId) -> EngineResult<Agent> {
        let mut rows = self.rows.write().await;
        let in_scope = rows.get(&id).is_some_and(|a| scope.permits(a.tenant_id));
        if !in_scope {
            return Err(EngineError::not_found("Agent", id));
        }
        rows.remove(&id)
            .ok_or_else(|| EngineError::not_found("Agent", id))
    }
}
