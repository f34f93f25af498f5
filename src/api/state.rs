//! Application state for the scheduling API.
//!
//! This module defines the shared application state that is available
//! to all request handlers: the stores plus the injected metrics and
//! post-commit notification ports.

use std::sync::Arc;

use crate::ports::{ChangeEvent, ChangeNotifier, Metrics, NoopMetrics};
use crate::store::{AgentStore, CascadeCleaner, ShiftStore};

/// Shared application state.
///
/// Contains resources shared across all request handlers. Metrics and
/// notifiers default to no-ops; deployments inject real implementations
/// through the builder methods.
#[derive(Clone)]
pub struct AppState {
    shifts: Arc<ShiftStore>,
    agents: Arc<AgentStore>,
    metrics: Arc<dyn Metrics>,
    notifiers: Arc<Vec<Arc<dyn ChangeNotifier>>>,
}

impl AppState {
    /// Creates application state over the given stores with no-op ports.
    pub fn new(shifts: ShiftStore, agents: AgentStore) -> Self {
        Self {
            shifts: Arc::new(shifts),
            agents: Arc::new(agents),
            metrics: Arc::new(NoopMetrics),
            notifiers: Arc::new(Vec::new()),
        }
    }

    /// Replaces the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Appends a post-commit change listener.
    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        let mut notifiers = (*self.notifiers).clone();
        notifiers.push(notifier);
        self.notifiers = Arc::new(notifiers);
        self
    }

    /// The shift store.
    pub fn shifts(&self) -> &ShiftStore {
        &self.shifts
    }

    /// The agent store.
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// The metrics sink.
    pub fn metrics(&self) -> &dyn Metrics {
        self.metrics.as_ref()
    }

    /// A cascade cleaner over this state's stores.
    pub fn cleaner(&self) -> CascadeCleaner {
        CascadeCleaner::new(Arc::clone(&self.shifts), Arc::clone(&self.agents))
    }

    /// Publishes `event` to every registered listener. Called only after
    /// the store operation succeeded; listener behavior never feeds back
    /// into the request result.
    pub fn notify(&self, event: &ChangeEvent) {
        for notifier in self.notifiers.iter() {
            notifier.publish(event);
        }
    }
}
