//! Scriptable subsystem for unit tests.
//!
//! A [`MockSubsystem`] is boxed into the orchestrator; the paired
//! [`MockHandle`] stays with the test to change outcomes and count calls.

use parking_lot::Mutex;
use serde_json::json;
use shared_types::{
    HealthReport, HealthStatus, Snapshot, Subsystem, SubsystemError, SubsystemErrorKind,
};
use std::sync::Arc;

/// How a scripted capability call behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `Ok(true)` or `Ok(snapshot)`
    Succeed,
    /// `Ok(false)`; for calls returning a snapshot this behaves like `Error`
    Decline,
    /// `Err(SubsystemError)`
    Error,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub initialize: Outcome,
    pub validate: Outcome,
    pub operate: Outcome,
    pub reconcile: Outcome,
    pub checkpoint: Outcome,
    pub terminate: Outcome,
    pub health: HealthStatus,
    pub health_probe_fails: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            initialize: Outcome::Succeed,
            validate: Outcome::Succeed,
            operate: Outcome::Succeed,
            reconcile: Outcome::Succeed,
            checkpoint: Outcome::Succeed,
            terminate: Outcome::Succeed,
            health: HealthStatus::Healthy,
            health_probe_fails: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub initialize: u32,
    pub validate: u32,
    pub operate: u32,
    pub reconcile: u32,
    pub checkpoint: u32,
    pub terminate: u32,
    pub health: u32,
}

#[derive(Default)]
struct Inner {
    script: Script,
    calls: Calls,
}

/// Shared log of `"<call>:<name>"` entries across several mocks.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub struct MockSubsystem {
    name: String,
    inner: Arc<Mutex<Inner>>,
    journal: Option<Journal>,
}

#[derive(Clone)]
pub struct MockHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockSubsystem {
    pub fn new(name: &str) -> (Self, MockHandle) {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let subsystem = Self {
            name: name.to_string(),
            inner: Arc::clone(&inner),
            journal: None,
        };
        (subsystem, MockHandle { inner })
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(Arc::clone(journal));
        self
    }

    fn record(&self, call: &str) {
        if let Some(journal) = &self.journal {
            journal.lock().push(format!("{call}:{}", self.name));
        }
    }

    fn error(&self, kind: SubsystemErrorKind) -> SubsystemError {
        SubsystemError::new(&self.name, kind, "scripted failure")
    }

    fn flag(&self, outcome: Outcome, kind: SubsystemErrorKind) -> Result<bool, SubsystemError> {
        match outcome {
            Outcome::Succeed => Ok(true),
            Outcome::Decline => Ok(false),
            Outcome::Error => Err(self.error(kind)),
        }
    }
}

impl MockHandle {
    pub fn set(&self, edit: impl FnOnce(&mut Script)) {
        edit(&mut self.inner.lock().script);
    }

    pub fn calls(&self) -> Calls {
        self.inner.lock().calls.clone()
    }
}

impl Subsystem for MockSubsystem {
    fn initialize(&mut self) -> Result<bool, SubsystemError> {
        self.record("initialize");
        let outcome = {
            let mut inner = self.inner.lock();
            inner.calls.initialize += 1;
            inner.script.initialize
        };
        self.flag(outcome, SubsystemErrorKind::InitializationFailed)
    }

    fn validate(&mut self) -> Result<bool, SubsystemError> {
        self.record("validate");
        let outcome = {
            let mut inner = self.inner.lock();
            inner.calls.validate += 1;
            inner.script.validate
        };
        self.flag(outcome, SubsystemErrorKind::ValidationFailed)
    }

    fn operate(&mut self) -> Result<Snapshot, SubsystemError> {
        self.record("operate");
        let (outcome, count) = {
            let mut inner = self.inner.lock();
            inner.calls.operate += 1;
            (inner.script.operate, inner.calls.operate)
        };
        match outcome {
            Outcome::Succeed => Ok(json!({ "operations": count })),
            _ => Err(self.error(SubsystemErrorKind::RuntimeError)),
        }
    }

    fn reconcile(&mut self) -> Result<bool, SubsystemError> {
        self.record("reconcile");
        let outcome = {
            let mut inner = self.inner.lock();
            inner.calls.reconcile += 1;
            inner.script.reconcile
        };
        self.flag(outcome, SubsystemErrorKind::ReconciliationFailed)
    }

    fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
        self.record("checkpoint");
        let (outcome, count) = {
            let mut inner = self.inner.lock();
            inner.calls.checkpoint += 1;
            (inner.script.checkpoint, inner.calls.checkpoint)
        };
        match outcome {
            Outcome::Succeed => Ok(json!({ "sequence": count })),
            _ => Err(self.error(SubsystemErrorKind::CheckpointFailed)),
        }
    }

    fn terminate(&mut self) -> Result<bool, SubsystemError> {
        self.record("terminate");
        let outcome = {
            let mut inner = self.inner.lock();
            inner.calls.terminate += 1;
            inner.script.terminate
        };
        self.flag(outcome, SubsystemErrorKind::ShutdownFailed)
    }

    fn get_state(&self) -> Snapshot {
        let inner = self.inner.lock();
        json!({ "name": self.name, "operations": inner.calls.operate })
    }

    fn get_health(&self) -> Result<HealthReport, SubsystemError> {
        let (status, fails) = {
            let mut inner = self.inner.lock();
            inner.calls.health += 1;
            (inner.script.health, inner.script.health_probe_fails)
        };
        if fails {
            return Err(self.error(SubsystemErrorKind::HealthProbeFailed));
        }
        Ok(HealthReport::new(status))
    }
}
