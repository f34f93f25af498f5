//! Injected side-effect ports.
//!
//! Request counting and change notification are explicit interfaces
//! handed to the application state, never process-wide mutable state.
//! Notifications are post-commit: handlers publish only after the store
//! operation succeeded, and the operation's result never depends on
//! whether a notifier does anything useful with the event.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::models::{AgentId, ShiftId};

/// Request counters.
pub trait Metrics: Send + Sync {
    /// Records one schedule-generation request.
    fn record_generation(&self) {}

    /// Records one single-shift creation request.
    fn record_shift_create(&self) {}
}

/// Metrics sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {}

/// Atomic in-process counters, suitable for tests and single-process
/// deployments.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    generation: AtomicU64,
    shift_create: AtomicU64,
}

impl CountingMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generation requests recorded so far.
    pub fn generations(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Number of shift-creation requests recorded so far.
    pub fn shift_creates(&self) -> u64 {
        self.shift_create.load(Ordering::Relaxed)
    }
}

impl Metrics for CountingMetrics {
    fn record_generation(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    fn record_shift_create(&self) {
        self.shift_create.fetch_add(1, Ordering::Relaxed);
    }
}

/// A data-change event published to listeners after a successful store
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChangeEvent {
    /// A single shift was created.
    ShiftCreated {
        /// The new shift.
        shift_id: ShiftId,
    },
    /// A shift was edited.
    ShiftUpdated {
        /// The edited shift.
        shift_id: ShiftId,
    },
    /// A shift was deleted individually.
    ShiftDeleted {
        /// The deleted shift.
        shift_id: ShiftId,
    },
    /// A generation run persisted new shifts.
    ScheduleGenerated {
        /// Newly inserted record count.
        inserted: u64,
    },
    /// An agent and its dependent shifts were removed.
    AgentRemoved {
        /// The deleted agent.
        agent_id: AgentId,
        /// Dependent shifts removed by the cascade.
        removed_shifts: u64,
    },
}

/// A listener for data-change events.
///
/// Implementations must absorb their own failures; publishing has no
/// return channel back into the request path.
pub trait ChangeNotifier: Send + Sync {
    /// Delivers one event.
    fn publish(&self, event: &ChangeEvent);
}

/// Notifier that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn publish(&self, _event: &ChangeEvent) {}
}

/// Notifier that records events in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything published so far.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn publish(&self, event: &ChangeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
