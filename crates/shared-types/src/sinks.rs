//! # Event Sink Adapters
//!
//! - [`TracingSink`]: forwards events to `tracing` under the `lifecycle`
//!   target. Default for production wiring.
//! - [`MemorySink`]: keeps every event in order. Used by tests to assert on
//!   what a component reported without installing a global subscriber.

use crate::entities::LifecycleState;
use crate::events::{EventSink, LifecycleEvent, Severity};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

/// Sink that turns lifecycle events into structured log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: LifecycleEvent) {
        let subsystem = event.subsystem().unwrap_or("-");
        match event.severity() {
            Severity::Debug => debug!(target: "lifecycle", subsystem, "{}", event),
            Severity::Info => info!(target: "lifecycle", subsystem, "{}", event),
            Severity::Warn => warn!(target: "lifecycle", subsystem, "{}", event),
            Severity::Error => error!(target: "lifecycle", subsystem, "{}", event),
            Severity::Critical => {
                error!(target: "lifecycle", subsystem, critical = true, "{}", event)
            }
        }
    }
}

/// Sink that records events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far, oldest first.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().clone()
    }

    /// Drain all recorded events.
    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&LifecycleEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// State transitions recorded for one subsystem, in order.
    pub fn transitions_for(&self, name: &str) -> Vec<(LifecycleState, LifecycleState)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                LifecycleEvent::Transition {
                    subsystem,
                    from,
                    to,
                } if subsystem == name => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: LifecycleEvent) {
        self.events.lock().push(event);
    }
}
