//! Tenant identity and scoping types.
//!
//! Every agent and shift belongs to exactly one tenant (the owning
//! account). Read and write operations carry an explicit [`TenantScope`]
//! so that scoping is enforced at the store boundary rather than left to
//! callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the owning account under which agents and shifts are
/// partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    /// Generates a fresh random tenant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The tenant visibility of a caller.
///
/// A privileged role operates without tenant restriction; every other
/// caller is pinned to its own tenant. The scope is threaded explicitly
/// through every store operation — it is never ambient state.
///
/// # Example
///
/// ```
/// use roster_engine::models::{TenantId, TenantScope};
///
/// let tenant = TenantId::new();
/// assert!(TenantScope::Unrestricted.permits(tenant));
/// assert!(TenantScope::Tenant(tenant).permits(tenant));
/// assert!(!TenantScope::Tenant(TenantId::new()).permits(tenant));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Cross-tenant visibility (privileged role). No tenant filter applied.
    Unrestricted,
    /// Visibility limited to a single tenant.
    Tenant(TenantId),
}

impl TenantScope {
    /// Returns true if records owned by `tenant` are visible in this scope.
    pub fn permits(&self, tenant: TenantId) -> bool {
        match self {
            TenantScope::Unrestricted => true,
            TenantScope::Tenant(own) => *own == tenant,
        }
    }

    /// The concrete tenant this scope is pinned to, if any.
    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            TenantScope::Unrestricted => None,
            TenantScope::Tenant(own) => Some(*own),
        }
    }
}
