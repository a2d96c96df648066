//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::RecoveryOutcome;
use crate::domain::errors::OrchestratorError;
use shared_types::{DynSubsystem, HealthReport, Snapshot};
use std::collections::BTreeMap;

/// Primary Lifecycle Orchestrator API
///
/// Every entry point runs to completion before returning. Implementations
/// serialize all of them against the registry.
pub trait LifecycleOrchestratorApi: Send + Sync {
    /// Add a subsystem under a unique name.
    ///
    /// Fails if the name is already registered.
    fn register_subsystem(
        &self,
        name: &str,
        subsystem: DynSubsystem,
        depends_on: &[&str],
    ) -> Result<(), OrchestratorError>;

    /// Initialize every subsystem in dependency order.
    ///
    /// Fail-fast: the first subsystem that does not reach operational stops
    /// the batch and `Ok(false)` is returned. A dependency cycle is the only
    /// error propagated.
    fn initialize_all(&self) -> Result<bool, OrchestratorError>;

    /// Validate every subsystem, fail-fast.
    fn validate_all(&self) -> bool;

    /// Run one subsystem's `operate()`. Requires `operational`.
    fn operate_subsystem(&self, name: &str) -> Result<Snapshot, OrchestratorError>;

    /// Run one subsystem's `reconcile()`. Requires `operational`.
    fn reconcile_subsystem(&self, name: &str) -> Result<bool, OrchestratorError>;

    /// Take and retain one checkpoint. Requires `operational`.
    ///
    /// A failing `checkpoint()` yields `Ok(false)` and is never fatal.
    fn checkpoint_subsystem(&self, name: &str) -> Result<bool, OrchestratorError>;

    /// Checkpoint every subsystem, best-effort.
    ///
    /// True only if every individual checkpoint succeeded.
    fn checkpoint_all(&self) -> bool;

    /// Poll `get_health()` everywhere, recovering subsystems that report
    /// critical. Returns the last report per subsystem.
    fn monitor_health(&self) -> BTreeMap<String, HealthReport>;

    /// Run the recovery procedure for an externally detected failure.
    fn report_failure(&self, name: &str) -> Result<RecoveryOutcome, OrchestratorError>;

    /// Terminate operational subsystems in reverse dependency order.
    fn terminate_all(&self) -> Result<bool, OrchestratorError>;
}
