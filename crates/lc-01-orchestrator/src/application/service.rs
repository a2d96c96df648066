//! Lifecycle Orchestrator Service
//!
//! Main service implementing `LifecycleOrchestratorApi`.
//!
//! Every public entry point takes the registry lock once and holds it until
//! it returns, so batch operations and recovery never interleave. Internal
//! helpers take `&mut Registry` so recovery can reuse them while the lock is
//! already held.

use super::registry::Registry;
use crate::algorithms::resolve_dependencies;
use crate::config::OrchestratorConfig;
use crate::domain::entities::{
    Checkpoint, RecoveryOutcome, RegistrationRecord, SubsystemStatusView, SystemStatus,
};
use crate::domain::errors::{DependencyError, OrchestratorError};
use crate::domain::invariants::invariant_dependency_order;
use crate::domain::transitions::{expected_source, is_permitted, TransitionMode};
use crate::ports::inbound::LifecycleOrchestratorApi;
use chrono::Utc;
use parking_lot::Mutex;
use shared_types::{
    DynSubsystem, EventSink, HealthReport, LifecycleEvent, LifecycleState, PhaseOutcome,
    Snapshot, TracingSink, ORCHESTRATOR_SUBJECT,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lifecycle Orchestrator
///
/// Owns every registered subsystem and is the only writer of their
/// lifecycle state.
pub struct Orchestrator {
    config: OrchestratorConfig,
    sink: Arc<dyn EventSink>,
    registry: Mutex<Registry>,
}

impl Orchestrator {
    /// Create an orchestrator reporting into `sink`.
    pub fn new(config: OrchestratorConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            sink,
            registry: Mutex::new(Registry::new()),
        }
    }

    /// Default config, events logged through `tracing`.
    pub fn with_defaults() -> Self {
        Self::new(OrchestratorConfig::default(), Arc::new(TracingSink::new()))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Aggregate state of the orchestrator.
    pub fn orchestrator_state(&self) -> LifecycleState {
        self.registry.lock().orchestrator_state
    }

    /// Lifecycle state of one subsystem.
    pub fn state(&self, name: &str) -> Option<LifecycleState> {
        self.registry.lock().state_of(name)
    }

    pub fn recovery_attempts(&self, name: &str) -> Option<u32> {
        let reg = self.registry.lock();
        reg.get(name).ok().map(RegistrationRecord::recovery_attempts)
    }

    /// Retained checkpoints, oldest first.
    pub fn checkpoints(&self, name: &str) -> Option<Vec<Checkpoint>> {
        let reg = self.registry.lock();
        reg.get(name).ok().map(|record| record.checkpoints.to_vec())
    }

    pub fn latest_checkpoint(&self, name: &str) -> Option<Checkpoint> {
        let reg = self.registry.lock();
        reg.get(name)
            .ok()
            .and_then(|record| record.checkpoints.latest().cloned())
    }

    /// The subsystem's own `get_state()` view.
    pub fn subsystem_state(&self, name: &str) -> Option<Snapshot> {
        let reg = self.registry.lock();
        reg.get(name).ok().map(|record| record.instance.get_state())
    }

    /// Registered names in registration order.
    pub fn subsystem_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    /// Whole-system status, as consumed by the validator.
    pub fn system_status(&self) -> SystemStatus {
        let reg = self.registry.lock();
        let subsystems: BTreeMap<String, SubsystemStatusView> = reg
            .records()
            .map(|record| (record.name.clone(), record.status_view()))
            .collect();

        SystemStatus {
            orchestrator_state: reg.orchestrator_state,
            subsystems,
            timestamp: Utc::now(),
        }
    }

    /// Initialization order for the current registry.
    pub fn resolve_order(&self) -> Result<Vec<String>, OrchestratorError> {
        let reg = self.registry.lock();
        self.resolve(&reg)
    }

    /// Clear a subsystem's recovery attempt counter.
    ///
    /// An exhausted subsystem stays `failed`, but the next induced failure
    /// runs the recovery procedure again.
    pub fn reset_recovery(&self, name: &str) -> Result<(), OrchestratorError> {
        let mut reg = self.registry.lock();
        reg.get_mut(name)?.recovery_attempts = 0;
        Ok(())
    }

    // =========================================================================
    // INTERNALS (registry lock held by the caller)
    // =========================================================================

    pub(super) fn emit(&self, event: LifecycleEvent) {
        self.sink.emit(event);
    }

    fn phase(&self, phase: &'static str, subject: &str, outcome: PhaseOutcome) {
        self.emit(LifecycleEvent::Phase {
            phase,
            subject: subject.to_string(),
            outcome,
        });
    }

    pub(super) fn fault(&self, subsystem: &str, phase: &'static str, message: String) {
        self.emit(LifecycleEvent::Fault {
            subsystem: subsystem.to_string(),
            phase,
            message,
        });
    }

    fn resolve(&self, reg: &Registry) -> Result<Vec<String>, OrchestratorError> {
        let nodes = reg.names();
        let dependencies = reg.dependency_map();
        let resolved =
            resolve_dependencies(&nodes, &dependencies, self.config.strict_dependencies)?;

        for skipped in resolved.skipped {
            self.emit(LifecycleEvent::DependencySkipped {
                subsystem: skipped.subsystem,
                dependency: skipped.dependency,
            });
        }
        debug_assert!(invariant_dependency_order(&resolved.order, &dependencies));

        Ok(resolved.order)
    }

    /// Check that `record` may move to `to` without changing anything.
    fn require(
        &self,
        record: &RegistrationRecord,
        to: LifecycleState,
        mode: TransitionMode,
    ) -> Result<(), OrchestratorError> {
        if is_permitted(record.state, to, mode) {
            return Ok(());
        }
        Err(OrchestratorError::InvalidState {
            name: record.name.clone(),
            current: record.state,
            expected: expected_source(to),
        })
    }

    /// The single place a subsystem's state changes.
    pub(super) fn transition(
        &self,
        record: &mut RegistrationRecord,
        to: LifecycleState,
        mode: TransitionMode,
    ) -> Result<(), OrchestratorError> {
        self.require(record, to, mode)?;
        let from = record.state;
        record.state = to;
        self.emit(LifecycleEvent::Transition {
            subsystem: record.name.clone(),
            from,
            to,
        });
        Ok(())
    }

    /// Move to `failed`. No-op if already there.
    pub(super) fn mark_failed(&self, record: &mut RegistrationRecord) {
        if record.state == LifecycleState::Failed {
            return;
        }
        // Any non-failed state may enter failed
        let _ = self.transition(record, LifecycleState::Failed, TransitionMode::Normal);
    }

    /// Report the result of a phase, marking the subsystem failed unless the
    /// phase was refused before anything changed.
    fn settle(
        &self,
        record: &mut RegistrationRecord,
        phase: &'static str,
        result: Result<(), OrchestratorError>,
    ) -> bool {
        match result {
            Ok(()) => {
                self.phase(phase, &record.name, PhaseOutcome::Success);
                true
            }
            Err(err) => {
                self.fault(&record.name, phase, err.to_string());
                if !matches!(err, OrchestratorError::InvalidState { .. }) {
                    self.mark_failed(record);
                }
                false
            }
        }
    }

    /// Every registered dependency must be operational. Unregistered ones
    /// are ignored unless strict.
    fn check_dependencies(&self, reg: &Registry, name: &str) -> Result<(), OrchestratorError> {
        let record = reg.get(name)?;
        for dependency in &record.dependencies {
            match reg.state_of(dependency) {
                Some(LifecycleState::Operational) => {}
                Some(state) => {
                    return Err(DependencyError::NotOperational {
                        subsystem: name.to_string(),
                        dependency: dependency.clone(),
                        state,
                    }
                    .into())
                }
                None if self.config.strict_dependencies => {
                    return Err(DependencyError::Unregistered {
                        subsystem: name.to_string(),
                        dependency: dependency.clone(),
                    }
                    .into())
                }
                None => {}
            }
        }
        Ok(())
    }

    fn try_initialize(
        &self,
        reg: &mut Registry,
        name: &str,
        mode: TransitionMode,
    ) -> Result<(), OrchestratorError> {
        self.require(reg.get(name)?, LifecycleState::Initializing, mode)?;
        self.check_dependencies(reg, name)?;

        let record = reg.get_mut(name)?;
        self.transition(record, LifecycleState::Initializing, mode)?;
        match record.instance.initialize() {
            Ok(true) => self.transition(record, LifecycleState::Operational, mode),
            Ok(false) => Err(OrchestratorError::Lifecycle {
                name: name.to_string(),
                phase: "initialize",
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Drive one subsystem to `operational`.
    pub(super) fn initialize_one(
        &self,
        reg: &mut Registry,
        name: &str,
        mode: TransitionMode,
    ) -> bool {
        let result = self.try_initialize(reg, name, mode);
        match reg.get_mut(name) {
            Ok(record) => self.settle(record, "initialize", result),
            Err(_) => false,
        }
    }

    fn try_validate(&self, record: &mut RegistrationRecord) -> Result<(), OrchestratorError> {
        self.transition(record, LifecycleState::Validating, TransitionMode::Normal)?;
        match record.instance.validate() {
            Ok(true) => {
                self.transition(record, LifecycleState::Operational, TransitionMode::Normal)
            }
            Ok(false) => Err(OrchestratorError::Lifecycle {
                name: record.name.clone(),
                phase: "validate",
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn validate_one(&self, reg: &mut Registry, name: &str) -> bool {
        let Ok(record) = reg.get_mut(name) else {
            return false;
        };
        let result = self.try_validate(record);
        self.settle(record, "validate", result)
    }

    fn try_reconcile(
        &self,
        record: &mut RegistrationRecord,
        mode: TransitionMode,
    ) -> Result<(), OrchestratorError> {
        self.transition(record, LifecycleState::Reconciling, mode)?;
        match record.instance.reconcile() {
            Ok(true) => self.transition(record, LifecycleState::Operational, mode),
            Ok(false) => Err(OrchestratorError::Reconciliation {
                name: record.name.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Run `reconcile()`. A refused precondition is returned as an error;
    /// a failing reconcile yields `Ok(false)` with the subsystem `failed`.
    pub(super) fn reconcile_one(
        &self,
        reg: &mut Registry,
        name: &str,
        mode: TransitionMode,
    ) -> Result<bool, OrchestratorError> {
        let record = reg.get_mut(name)?;
        self.require(record, LifecycleState::Reconciling, mode)?;
        let result = self.try_reconcile(record, mode);
        Ok(self.settle(record, "reconcile", result))
    }

    /// Take one checkpoint. The subsystem is returned to `operational`
    /// whether or not `checkpoint()` succeeded.
    fn checkpoint_one(&self, reg: &mut Registry, name: &str) -> Result<bool, OrchestratorError> {
        let record = reg.get_mut(name)?;
        self.transition(record, LifecycleState::Checkpointing, TransitionMode::Normal)?;

        let recorded = match record.instance.checkpoint() {
            Ok(data) => {
                record.checkpoints.push(Checkpoint {
                    timestamp: Utc::now(),
                    state: record.state,
                    data,
                });
                true
            }
            Err(err) => {
                self.emit(LifecycleEvent::CheckpointFailed {
                    subsystem: name.to_string(),
                    message: err.to_string(),
                });
                false
            }
        };

        self.transition(record, LifecycleState::Operational, TransitionMode::Normal)?;
        if recorded {
            self.emit(LifecycleEvent::CheckpointRecorded {
                subsystem: name.to_string(),
                retained: record.checkpoints.len(),
            });
        }
        Ok(recorded)
    }

    /// Terminate one subsystem. Never-started and already-terminated
    /// subsystems count as done; anything else not operational is skipped
    /// and counts as a failure.
    fn terminate_one(&self, reg: &mut Registry, name: &str) -> bool {
        let Ok(record) = reg.get_mut(name) else {
            return false;
        };
        match record.state {
            LifecycleState::Uninitialized | LifecycleState::Terminated => return true,
            LifecycleState::Operational => {}
            other => {
                self.fault(name, "terminate", format!("skipped while {other}"));
                return false;
            }
        }

        if let Err(err) = self.transition(record, LifecycleState::Terminating, TransitionMode::Normal)
        {
            self.fault(name, "terminate", err.to_string());
            return false;
        }
        match record.instance.terminate() {
            Ok(true) => {
                if let Err(err) =
                    self.transition(record, LifecycleState::Terminated, TransitionMode::Normal)
                {
                    self.fault(name, "terminate", err.to_string());
                    return false;
                }
                self.phase("terminate", name, PhaseOutcome::Success);
                true
            }
            Ok(false) => {
                self.fault(name, "terminate", "terminate() returned false".to_string());
                false
            }
            Err(err) => {
                self.fault(name, "terminate", err.to_string());
                false
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LifecycleOrchestratorApi for Orchestrator {
    fn register_subsystem(
        &self,
        name: &str,
        subsystem: DynSubsystem,
        depends_on: &[&str],
    ) -> Result<(), OrchestratorError> {
        let mut reg = self.registry.lock();
        if reg.contains(name) {
            return Err(OrchestratorError::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        let mut dependencies: Vec<String> = Vec::with_capacity(depends_on.len());
        for dependency in depends_on {
            if !dependencies.iter().any(|d| d == dependency) {
                dependencies.push(dependency.to_string());
            }
        }

        reg.insert(RegistrationRecord::new(
            name.to_string(),
            subsystem,
            dependencies.clone(),
            self.config.effective_checkpoint_capacity(),
        ))?;
        self.emit(LifecycleEvent::Registered {
            subsystem: name.to_string(),
            dependencies,
        });
        Ok(())
    }

    fn initialize_all(&self) -> Result<bool, OrchestratorError> {
        let mut reg = self.registry.lock();
        self.phase("initialize_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Starting);

        let order = match self.resolve(&reg) {
            Ok(order) => order,
            Err(err) => {
                self.fault(ORCHESTRATOR_SUBJECT, "initialize_all", err.to_string());
                self.phase("initialize_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Failed);
                return Err(err);
            }
        };

        for name in &order {
            if reg.state_of(name) == Some(LifecycleState::Operational) {
                continue;
            }
            if !self.initialize_one(&mut reg, name, TransitionMode::Normal) {
                reg.orchestrator_state = LifecycleState::Failed;
                self.phase("initialize_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Failed);
                return Ok(false);
            }
        }

        reg.orchestrator_state = LifecycleState::Operational;
        self.phase("initialize_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Complete);
        Ok(true)
    }

    fn validate_all(&self) -> bool {
        let mut reg = self.registry.lock();
        self.phase("validate_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Starting);

        for name in reg.names() {
            if !self.validate_one(&mut reg, &name) {
                self.phase("validate_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Failed);
                return false;
            }
        }

        self.phase("validate_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Complete);
        true
    }

    fn operate_subsystem(&self, name: &str) -> Result<Snapshot, OrchestratorError> {
        let mut reg = self.registry.lock();
        let record = reg.get_mut(name)?;
        if record.state != LifecycleState::Operational {
            return Err(OrchestratorError::InvalidState {
                name: name.to_string(),
                current: record.state,
                expected: LifecycleState::Operational,
            });
        }

        match record.instance.operate() {
            Ok(result) => Ok(result),
            Err(source) => {
                self.fault(name, "operate", source.to_string());
                let recovery = self.handle_failure(&mut reg, name)?;
                Err(OrchestratorError::Operation {
                    name: name.to_string(),
                    source,
                    recovery,
                })
            }
        }
    }

    fn reconcile_subsystem(&self, name: &str) -> Result<bool, OrchestratorError> {
        let mut reg = self.registry.lock();
        self.reconcile_one(&mut reg, name, TransitionMode::Normal)
    }

    fn checkpoint_subsystem(&self, name: &str) -> Result<bool, OrchestratorError> {
        let mut reg = self.registry.lock();
        self.checkpoint_one(&mut reg, name)
    }

    fn checkpoint_all(&self) -> bool {
        let mut reg = self.registry.lock();
        let mut all_recorded = true;

        for name in reg.names() {
            match self.checkpoint_one(&mut reg, &name) {
                Ok(true) => {}
                Ok(false) => all_recorded = false,
                Err(err) => {
                    self.emit(LifecycleEvent::CheckpointFailed {
                        subsystem: name,
                        message: err.to_string(),
                    });
                    all_recorded = false;
                }
            }
        }

        all_recorded
    }

    fn monitor_health(&self) -> BTreeMap<String, HealthReport> {
        let mut reg = self.registry.lock();

        for name in reg.names() {
            let probe = match reg.get(&name) {
                Ok(record) => record.instance.get_health(),
                Err(_) => continue,
            };

            let report = match probe {
                Ok(report) => report,
                Err(err) => {
                    self.fault(&name, "health", err.to_string());
                    HealthReport::probe_error(err.to_string())
                }
            };
            let critical = report.is_critical();
            let status = report.status;
            if let Ok(record) = reg.get_mut(&name) {
                record.last_health = Some(report);
            }

            if critical {
                self.emit(LifecycleEvent::HealthAlarm {
                    subsystem: name.clone(),
                    status,
                });
                if let Err(err) = self.handle_failure(&mut reg, &name) {
                    self.fault(&name, "recover", err.to_string());
                }
            }
        }

        reg.records()
            .filter_map(|record| {
                record
                    .last_health
                    .clone()
                    .map(|report| (record.name.clone(), report))
            })
            .collect()
    }

    fn report_failure(&self, name: &str) -> Result<RecoveryOutcome, OrchestratorError> {
        let mut reg = self.registry.lock();
        self.handle_failure(&mut reg, name)
    }

    fn terminate_all(&self) -> Result<bool, OrchestratorError> {
        let mut reg = self.registry.lock();
        self.phase("terminate_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Starting);

        let order = match self.resolve(&reg) {
            Ok(order) => order,
            Err(err) => {
                self.fault(ORCHESTRATOR_SUBJECT, "terminate_all", err.to_string());
                self.phase("terminate_all", ORCHESTRATOR_SUBJECT, PhaseOutcome::Failed);
                return Err(err);
            }
        };

        let mut success = true;
        for name in order.iter().rev() {
            if !self.terminate_one(&mut reg, name) {
                success = false;
            }
        }

        reg.orchestrator_state = LifecycleState::Terminated;
        let outcome = if success {
            PhaseOutcome::Complete
        } else {
            PhaseOutcome::Failed
        };
        self.phase("terminate_all", ORCHESTRATOR_SUBJECT, outcome);
        Ok(success)
    }
}
