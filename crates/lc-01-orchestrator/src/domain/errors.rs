//! Error types for the Lifecycle Orchestrator

use super::entities::RecoveryOutcome;
use shared_types::{LifecycleState, SubsystemError};
use thiserror::Error;

/// All errors the orchestrator's public entry points can return
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestratorError {
    /// Name collision at registration
    #[error("Subsystem '{name}' already registered")]
    AlreadyRegistered { name: String },

    /// Operation addressed a name that was never registered
    #[error("Unknown subsystem: {name}")]
    UnknownSubsystem { name: String },

    /// Dependency graph problem
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// Operation invoked against a subsystem in the wrong state
    #[error("Subsystem '{name}' is {current}, expected {expected}")]
    InvalidState {
        name: String,
        current: LifecycleState,
        expected: LifecycleState,
    },

    /// A capability call returned false
    #[error("{phase} failed for subsystem: {name}")]
    Lifecycle { name: String, phase: &'static str },

    /// `reconcile()` returned false
    #[error("Reconciliation failed for subsystem: {name}")]
    Reconciliation { name: String },

    /// A capability call returned an error
    #[error(transparent)]
    Subsystem(#[from] SubsystemError),

    /// `operate()` failed; recovery already ran before this was returned
    #[error("Operation failed for subsystem '{name}': {source} (recovery: {recovery})")]
    Operation {
        name: String,
        source: SubsystemError,
        recovery: RecoveryOutcome,
    },
}

/// Dependency resolution and readiness errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// Revisited a node that was still being visited
    #[error("Circular dependency detected involving '{name}' ({})", .path.join(" -> "))]
    CycleDetected { name: String, path: Vec<String> },

    /// Strict mode: dependency on a name that was never registered
    #[error("Dependency '{dependency}' of '{subsystem}' is not registered")]
    Unregistered {
        subsystem: String,
        dependency: String,
    },

    /// Dependency has not reached operational yet
    #[error("Dependency '{dependency}' not operational for '{subsystem}' (state: {state})")]
    NotOperational {
        subsystem: String,
        dependency: String,
        state: LifecycleState,
    },
}
