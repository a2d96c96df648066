//! # Core Lifecycle Entities
//!
//! The lifecycle state model and the health report shape shared between
//! subsystems and the orchestrator.
//!
//! ## State Set
//!
//! - **Resting**: `Uninitialized`, `Operational`, `Terminated`, `Failed`
//! - **Transient**: `Initializing`, `Validating`, `Reconciling`,
//!   `Checkpointing`, `Terminating`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deterministic, serializable view of a subsystem's internals.
///
/// Checkpoints, diagnostic state and health metrics are all snapshots.
pub type Snapshot = serde_json::Value;

// =============================================================================
// LIFECYCLE STATE
// =============================================================================

/// The nine stages a subsystem can occupy under orchestrator control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Registered, `initialize()` never attempted.
    #[default]
    Uninitialized,
    /// `initialize()` in progress.
    Initializing,
    /// `validate()` in progress.
    Validating,
    /// Ready to operate.
    Operational,
    /// `reconcile()` in progress.
    Reconciling,
    /// `checkpoint()` in progress.
    Checkpointing,
    /// `terminate()` in progress, or `terminate()` declined.
    Terminating,
    /// Resources released; restartable.
    Terminated,
    /// A capability call failed. Only the recovery procedure leaves this state.
    Failed,
}

impl LifecycleState {
    /// All states, in declaration order.
    pub const ALL: [LifecycleState; 9] = [
        Self::Uninitialized,
        Self::Initializing,
        Self::Validating,
        Self::Operational,
        Self::Reconciling,
        Self::Checkpointing,
        Self::Terminating,
        Self::Terminated,
        Self::Failed,
    ];

    /// Lowercase wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Validating => "validating",
            Self::Operational => "operational",
            Self::Reconciling => "reconciling",
            Self::Checkpointing => "checkpointing",
            Self::Terminating => "terminating",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        }
    }

    /// True for states a capability call is currently running in.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Initializing
                | Self::Validating
                | Self::Reconciling
                | Self::Checkpointing
                | Self::Terminating
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// HEALTH
// =============================================================================

/// Coarse health classification reported by `get_health()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Subsystem is running normally.
    Healthy,
    /// Subsystem is running but degraded (e.g., backlog growing).
    Degraded,
    /// Subsystem needs intervention. Treated as a failure by the orchestrator.
    Critical,
    /// The health probe itself failed.
    Error,
}

impl HealthStatus {
    /// Lowercase wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Critical => "critical",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health metrics returned by a subsystem's `get_health()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall classification.
    pub status: HealthStatus,
    /// Subsystem-specific metrics.
    #[serde(default)]
    pub metrics: Snapshot,
}

impl HealthReport {
    /// Create a report with the given status and no metrics.
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            metrics: Snapshot::Null,
        }
    }

    /// Healthy report with no metrics.
    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy)
    }

    /// Critical report with no metrics.
    pub fn critical() -> Self {
        Self::new(HealthStatus::Critical)
    }

    /// Report recorded when the health probe returned an error.
    pub fn probe_error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            metrics: serde_json::json!({ "error": message.into() }),
        }
    }

    /// Attach metrics.
    pub fn with_metrics(mut self, metrics: Snapshot) -> Self {
        self.metrics = metrics;
        self
    }

    /// Whether the orchestrator must treat this report as a failure.
    pub fn is_critical(&self) -> bool {
        self.status == HealthStatus::Critical
    }
}
