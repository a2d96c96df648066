//! # Subsystem Trait - The Capability Contract
//!
//! Defines the contract that ALL subsystems must implement to be driven by
//! the lifecycle orchestrator.
//!
//! ## Contract
//!
//! - **Expected failure is a value**: `initialize`, `validate`, `reconcile`
//!   and `terminate` return `Ok(false)` when they decline.
//! - **Unexpected failure is an error**: returning `Err(SubsystemError)` is
//!   the equivalent of the call blowing up. The orchestrator catches it at
//!   its boundary and moves the subsystem to `failed`.
//! - **No suspension**: every call runs to completion. There is no timeout
//!   around these calls, so a stalled call stalls the orchestrator.
//!
//! ## Example Implementation
//!
//! ```rust,ignore
//! use shared_types::{HealthReport, Snapshot, Subsystem, SubsystemError};
//!
//! pub struct Cache { entries: usize }
//!
//! impl Subsystem for Cache {
//!     fn initialize(&mut self) -> Result<bool, SubsystemError> { Ok(true) }
//!     fn validate(&mut self) -> Result<bool, SubsystemError> { Ok(true) }
//!     fn operate(&mut self) -> Result<Snapshot, SubsystemError> { Ok(Snapshot::Bool(true)) }
//!     fn reconcile(&mut self) -> Result<bool, SubsystemError> { Ok(true) }
//!     fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
//!         Ok(serde_json::json!({ "entries": self.entries }))
//!     }
//!     fn terminate(&mut self) -> Result<bool, SubsystemError> { Ok(true) }
//!     fn get_state(&self) -> Snapshot { serde_json::json!({ "entries": self.entries }) }
//!     fn get_health(&self) -> Result<HealthReport, SubsystemError> { Ok(HealthReport::healthy()) }
//! }
//! ```

use crate::entities::{HealthReport, Snapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for capability calls that fail unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemError {
    /// The subsystem that encountered the error.
    pub subsystem: String,
    /// Error kind.
    pub kind: SubsystemErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl SubsystemError {
    /// Create a new error.
    pub fn new(
        subsystem: impl Into<String>,
        kind: SubsystemErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subsystem: subsystem.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubsystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.subsystem, self.kind, self.message)
    }
}

impl std::error::Error for SubsystemError {}

/// Categories of subsystem errors, one per capability call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubsystemErrorKind {
    /// `initialize()` failed.
    InitializationFailed,
    /// `validate()` failed.
    ValidationFailed,
    /// `operate()` failed.
    RuntimeError,
    /// `reconcile()` failed.
    ReconciliationFailed,
    /// `checkpoint()` failed.
    CheckpointFailed,
    /// `terminate()` failed.
    ShutdownFailed,
    /// `get_health()` failed.
    HealthProbeFailed,
}

impl fmt::Display for SubsystemErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializationFailed => write!(f, "InitializationFailed"),
            Self::ValidationFailed => write!(f, "ValidationFailed"),
            Self::RuntimeError => write!(f, "RuntimeError"),
            Self::ReconciliationFailed => write!(f, "ReconciliationFailed"),
            Self::CheckpointFailed => write!(f, "CheckpointFailed"),
            Self::ShutdownFailed => write!(f, "ShutdownFailed"),
            Self::HealthProbeFailed => write!(f, "HealthProbeFailed"),
        }
    }
}

/// The capability interface ALL orchestrated subsystems implement.
///
/// The orchestrator owns each instance exclusively and serializes every call
/// through its registry lock, so implementations need `Send` but not `Sync`.
pub trait Subsystem: Send {
    /// Allocate resources and verify preconditions.
    ///
    /// Returns `Ok(false)` for an expected failure.
    fn initialize(&mut self) -> Result<bool, SubsystemError>;

    /// Confirm configuration and dependency consistency.
    ///
    /// `Ok(false)` blocks progression.
    fn validate(&mut self) -> Result<bool, SubsystemError>;

    /// Perform the subsystem's declared function and nothing else.
    fn operate(&mut self) -> Result<Snapshot, SubsystemError>;

    /// Detect and correct internal inconsistency in place.
    ///
    /// `Ok(false)` means the subsystem cannot be repaired without
    /// reinitialization.
    fn reconcile(&mut self) -> Result<bool, SubsystemError>;

    /// Deterministic, serializable view of internal state.
    fn checkpoint(&self) -> Result<Snapshot, SubsystemError>;

    /// Release resources, leaving the subsystem restartable.
    fn terminate(&mut self) -> Result<bool, SubsystemError>;

    /// Observable status for diagnostics.
    fn get_state(&self) -> Snapshot;

    /// Health metrics. A `Critical` status is handled as a failure.
    fn get_health(&self) -> Result<HealthReport, SubsystemError>;
}

/// A type-erased subsystem handle for the registry.
pub type DynSubsystem = Box<dyn Subsystem>;
