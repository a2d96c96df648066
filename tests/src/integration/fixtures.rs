//! # Integration Fixtures
//!
//! A [`Probe`] is a subsystem whose answers are switched from the test
//! through its [`ProbeControl`]. Every probe of a flow writes into one
//! [`CallLog`], so ordering across subsystems can be asserted.

use lc_01_orchestrator::{LifecycleOrchestratorApi, Orchestrator, OrchestratorConfig};
use parking_lot::Mutex;
use serde_json::json;
use shared_types::{
    HealthReport, HealthStatus, MemorySink, Snapshot, Subsystem, SubsystemError,
    SubsystemErrorKind,
};
use std::sync::Arc;

/// `"<call>:<name>"` entries in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone)]
pub struct Behavior {
    pub initialize_ok: bool,
    pub reconcile_ok: bool,
    pub operate_fails: bool,
    pub health: HealthStatus,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            initialize_ok: true,
            reconcile_ok: true,
            operate_fails: false,
            health: HealthStatus::Healthy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub initialize: u32,
    pub reconcile: u32,
    pub operate: u32,
    pub checkpoint: u32,
    pub terminate: u32,
}

#[derive(Default)]
struct ProbeState {
    behavior: Behavior,
    counters: Counters,
}

pub struct Probe {
    name: String,
    state: Arc<Mutex<ProbeState>>,
    log: CallLog,
}

#[derive(Clone)]
pub struct ProbeControl {
    state: Arc<Mutex<ProbeState>>,
}

impl ProbeControl {
    pub fn update(&self, edit: impl FnOnce(&mut Behavior)) {
        edit(&mut self.state.lock().behavior);
    }

    pub fn counters(&self) -> Counters {
        self.state.lock().counters.clone()
    }
}

impl Probe {
    fn log(&self, call: &str) {
        self.log.lock().push(format!("{call}:{}", self.name));
    }
}

impl Subsystem for Probe {
    fn initialize(&mut self) -> Result<bool, SubsystemError> {
        self.log("initialize");
        let mut state = self.state.lock();
        state.counters.initialize += 1;
        Ok(state.behavior.initialize_ok)
    }

    fn validate(&mut self) -> Result<bool, SubsystemError> {
        Ok(true)
    }

    fn operate(&mut self) -> Result<Snapshot, SubsystemError> {
        self.log("operate");
        let mut state = self.state.lock();
        state.counters.operate += 1;
        if state.behavior.operate_fails {
            return Err(SubsystemError::new(
                &self.name,
                SubsystemErrorKind::RuntimeError,
                "induced failure",
            ));
        }
        Ok(json!({ "operations": state.counters.operate }))
    }

    fn reconcile(&mut self) -> Result<bool, SubsystemError> {
        self.log("reconcile");
        let mut state = self.state.lock();
        state.counters.reconcile += 1;
        Ok(state.behavior.reconcile_ok)
    }

    fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
        let mut state = self.state.lock();
        state.counters.checkpoint += 1;
        Ok(json!({ "sequence": state.counters.checkpoint }))
    }

    fn terminate(&mut self) -> Result<bool, SubsystemError> {
        self.log("terminate");
        self.state.lock().counters.terminate += 1;
        Ok(true)
    }

    fn get_state(&self) -> Snapshot {
        json!({ "name": self.name })
    }

    fn get_health(&self) -> Result<HealthReport, SubsystemError> {
        Ok(HealthReport::new(self.state.lock().behavior.health))
    }
}

/// Orchestrator reporting into a fresh [`MemorySink`].
pub fn orchestrator() -> (Orchestrator, Arc<MemorySink>) {
    orchestrator_with(OrchestratorConfig::default())
}

pub fn orchestrator_with(config: OrchestratorConfig) -> (Orchestrator, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Orchestrator::new(config, sink.clone()), sink)
}

/// Register a probe named `name` and return its control.
pub fn register(
    orchestrator: &Orchestrator,
    log: &CallLog,
    name: &str,
    depends_on: &[&str],
) -> ProbeControl {
    let state = Arc::new(Mutex::new(ProbeState::default()));
    let probe = Probe {
        name: name.to_string(),
        state: Arc::clone(&state),
        log: Arc::clone(log),
    };
    orchestrator
        .register_subsystem(name, Box::new(probe), depends_on)
        .unwrap();
    ProbeControl { state }
}

/// Log entries for one kind of call, names only.
pub fn calls(log: &CallLog, call: &str) -> Vec<String> {
    let prefix = format!("{call}:");
    log.lock()
        .iter()
        .filter_map(|entry| entry.strip_prefix(&prefix).map(str::to_string))
        .collect()
}
