//! # Lifecycle Events
//!
//! Typed record of everything the orchestrator and validator report while
//! they work. Components emit events into an [`EventSink`] they receive at
//! construction; what happens to an event (structured log line, in-memory
//! capture, forwarding) is the sink's business.

use crate::entities::{HealthStatus, LifecycleState};
use std::fmt;

/// Severity attached to every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// Permanent failure that needs an operator.
    Critical,
}

/// Outcome of a lifecycle phase for a subsystem or for the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Starting,
    Success,
    Failed,
    Complete,
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// How a failed subsystem was brought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPath {
    Reconcile,
    Reinitialize,
}

impl fmt::Display for RecoveryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconcile => write!(f, "reconciliation"),
            Self::Reinitialize => write!(f, "reinitialization"),
        }
    }
}

/// Subject name used for orchestrator-wide phases.
pub const ORCHESTRATOR_SUBJECT: &str = "orchestrator";

/// Everything a lifecycle component can report.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// A subsystem joined the registry.
    Registered {
        subsystem: String,
        dependencies: Vec<String>,
    },
    /// A subsystem changed lifecycle state.
    Transition {
        subsystem: String,
        from: LifecycleState,
        to: LifecycleState,
    },
    /// A lifecycle phase started, finished or failed.
    Phase {
        phase: &'static str,
        subject: String,
        outcome: PhaseOutcome,
    },
    /// A capability call failed unexpectedly or declined.
    Fault {
        subsystem: String,
        phase: &'static str,
        message: String,
    },
    /// A dependency on an unregistered subsystem was ignored.
    DependencySkipped {
        subsystem: String,
        dependency: String,
    },
    /// `get_health()` reported a status the orchestrator reacts to.
    HealthAlarm {
        subsystem: String,
        status: HealthStatus,
    },
    /// The recovery procedure is about to run.
    RecoveryAttempt { subsystem: String, attempt: u32 },
    /// The recovery procedure brought the subsystem back.
    Recovered { subsystem: String, via: RecoveryPath },
    /// The recovery procedure gave up on a subsystem.
    RecoveryExhausted { subsystem: String, attempts: u32 },
    /// A checkpoint was appended to a subsystem's history.
    CheckpointRecorded { subsystem: String, retained: usize },
    /// A checkpoint could not be taken. Never fatal.
    CheckpointFailed { subsystem: String, message: String },
    /// A validation rule did not pass.
    RuleFailed {
        rule: String,
        critical: bool,
        message: String,
    },
    /// A validation run finished.
    ValidationCompleted { rules_checked: usize, passed: bool },
}

impl LifecycleEvent {
    /// Severity used when the event is logged.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Registered { .. }
            | Self::Transition { .. }
            | Self::Recovered { .. }
            | Self::CheckpointRecorded { .. } => Severity::Info,
            Self::Phase { outcome, .. } => match outcome {
                PhaseOutcome::Failed => Severity::Error,
                _ => Severity::Info,
            },
            Self::Fault { .. } | Self::CheckpointFailed { .. } => Severity::Error,
            Self::DependencySkipped { .. }
            | Self::HealthAlarm { .. }
            | Self::RecoveryAttempt { .. }
            | Self::RuleFailed { .. } => Severity::Warn,
            Self::RecoveryExhausted { .. } => Severity::Critical,
            Self::ValidationCompleted { passed, .. } => {
                if *passed {
                    Severity::Info
                } else {
                    Severity::Error
                }
            }
        }
    }

    /// Subsystem the event concerns, if any.
    pub fn subsystem(&self) -> Option<&str> {
        match self {
            Self::Registered { subsystem, .. }
            | Self::Transition { subsystem, .. }
            | Self::Fault { subsystem, .. }
            | Self::DependencySkipped { subsystem, .. }
            | Self::HealthAlarm { subsystem, .. }
            | Self::RecoveryAttempt { subsystem, .. }
            | Self::Recovered { subsystem, .. }
            | Self::RecoveryExhausted { subsystem, .. }
            | Self::CheckpointRecorded { subsystem, .. }
            | Self::CheckpointFailed { subsystem, .. } => Some(subsystem),
            Self::Phase { subject, .. } => Some(subject),
            Self::RuleFailed { .. } | Self::ValidationCompleted { .. } => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered {
                subsystem,
                dependencies,
            } => write!(f, "[{subsystem}] registered, depends on {dependencies:?}"),
            Self::Transition {
                subsystem,
                from,
                to,
            } => write!(f, "[{subsystem}] state transition: {from} -> {to}"),
            Self::Phase {
                phase,
                subject,
                outcome,
            } => write!(f, "[{subject}] {phase}: {outcome}"),
            Self::Fault {
                subsystem,
                phase,
                message,
            } => write!(f, "[{subsystem}] {phase} error: {message}"),
            Self::DependencySkipped {
                subsystem,
                dependency,
            } => write!(
                f,
                "[{subsystem}] dependency '{dependency}' is not registered, ignoring"
            ),
            Self::HealthAlarm { subsystem, status } => {
                write!(f, "[{subsystem}] health reported {status}")
            }
            Self::RecoveryAttempt { subsystem, attempt } => {
                write!(f, "[{subsystem}] attempting recovery (attempt {attempt})")
            }
            Self::Recovered { subsystem, via } => {
                write!(f, "[{subsystem}] recovered through {via}")
            }
            Self::RecoveryExhausted {
                subsystem,
                attempts,
            } => write!(
                f,
                "[{subsystem}] failed to recover after {attempts} attempts"
            ),
            Self::CheckpointRecorded {
                subsystem,
                retained,
            } => write!(f, "[{subsystem}] checkpoint recorded ({retained} retained)"),
            Self::CheckpointFailed { subsystem, message } => {
                write!(f, "[{subsystem}] checkpoint failed: {message}")
            }
            Self::RuleFailed {
                rule,
                critical,
                message,
            } => {
                let class = if *critical { "critical" } else { "advisory" };
                write!(f, "validation rule '{rule}' failed ({class}): {message}")
            }
            Self::ValidationCompleted {
                rules_checked,
                passed,
            } => write!(
                f,
                "system validation complete: {rules_checked} rules checked, passed={passed}"
            ),
        }
    }
}

/// Port through which lifecycle components report events.
///
/// Implementations must not call back into the component that emitted the
/// event; the orchestrator emits while holding its registry lock.
pub trait EventSink: Send + Sync {
    /// Accept one event.
    fn emit(&self, event: LifecycleEvent);
}
