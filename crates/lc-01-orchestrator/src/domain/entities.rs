//! Core entities for the Lifecycle Orchestrator

use super::checkpoint_ring::CheckpointRing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{DynSubsystem, HealthReport, LifecycleState, Snapshot};
use std::collections::BTreeMap;
use std::fmt;

/// One registered subsystem.
///
/// Created once by `register_subsystem` and kept for the orchestrator's
/// lifetime. Only the orchestrator's transition routine writes `state`.
pub struct RegistrationRecord {
    /// Unique, immutable name
    pub(crate) name: String,
    /// The subsystem itself, reached only through the capability trait
    pub(crate) instance: DynSubsystem,
    /// Names that must be operational before this one initializes
    pub(crate) dependencies: Vec<String>,
    /// Current lifecycle state
    pub(crate) state: LifecycleState,
    /// Bounded checkpoint history
    pub(crate) checkpoints: CheckpointRing,
    /// Induced failures since the last successful recovery
    pub(crate) recovery_attempts: u32,
    /// Last report returned by `get_health()`
    pub(crate) last_health: Option<HealthReport>,
}

impl RegistrationRecord {
    pub(crate) fn new(
        name: String,
        instance: DynSubsystem,
        dependencies: Vec<String>,
        checkpoint_capacity: usize,
    ) -> Self {
        Self {
            name,
            instance,
            dependencies,
            state: LifecycleState::Uninitialized,
            checkpoints: CheckpointRing::new(checkpoint_capacity),
            recovery_attempts: 0,
            last_health: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn recovery_attempts(&self) -> u32 {
        self.recovery_attempts
    }

    pub(crate) fn status_view(&self) -> SubsystemStatusView {
        SubsystemStatusView {
            state: self.state,
            health: self.last_health.clone(),
            checkpoints: self.checkpoints.len(),
            recovery_attempts: self.recovery_attempts,
            dependencies: self.dependencies.clone(),
        }
    }
}

impl fmt::Debug for RegistrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRecord")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("state", &self.state)
            .field("checkpoints", &self.checkpoints.len())
            .field("recovery_attempts", &self.recovery_attempts)
            .finish_non_exhaustive()
    }
}

/// A timestamped, orchestrator-tagged snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Wall-clock capture time
    pub timestamp: DateTime<Utc>,
    /// Orchestrator's view of the subsystem's state at capture time
    pub state: LifecycleState,
    /// What `checkpoint()` returned
    pub data: Snapshot,
}

/// Result of one run of the recovery procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecoveryOutcome {
    /// `reconcile()` repaired the subsystem
    Reconciled,
    /// Reconciliation failed, a full reinitialize succeeded
    Reinitialized,
    /// Both paths failed; later failures may still retry
    Failed { attempts: u32 },
    /// Attempt counter is past the ceiling; nothing was tried
    Exhausted { attempts: u32 },
}

impl RecoveryOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Reconciled | Self::Reinitialized)
    }
}

impl fmt::Display for RecoveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconciled => write!(f, "recovered through reconciliation"),
            Self::Reinitialized => write!(f, "recovered through reinitialization"),
            Self::Failed { attempts } => write!(f, "attempt {attempts} failed"),
            Self::Exhausted { attempts } => {
                write!(f, "permanently failed after {attempts} attempts")
            }
        }
    }
}

/// Per-subsystem entry of [`SystemStatus`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsystemStatusView {
    pub state: LifecycleState,
    pub health: Option<HealthReport>,
    /// Retained checkpoint count
    pub checkpoints: usize,
    pub recovery_attempts: u32,
    pub dependencies: Vec<String>,
}

/// Whole-system status consumed by external collaborators and the validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub orchestrator_state: LifecycleState,
    pub subsystems: BTreeMap<String, SubsystemStatusView>,
    pub timestamp: DateTime<Utc>,
}

impl SystemStatus {
    /// JSON form of the status, the shape validation rules inspect.
    pub fn to_snapshot(&self) -> Snapshot {
        serde_json::to_value(self).unwrap_or(Snapshot::Null)
    }

    /// Names of subsystems currently in `state`.
    pub fn in_state(&self, state: LifecycleState) -> Vec<&str> {
        self.subsystems
            .iter()
            .filter(|(_, view)| view.state == state)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
