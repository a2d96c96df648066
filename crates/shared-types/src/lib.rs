//! # Shared Types Crate
//!
//! Types shared by every crate that takes part in orchestrated lifecycle
//! management.
//!
//! ## Design Principles
//!
//! - **One contract**: A subsystem is anything implementing [`Subsystem`].
//!   The orchestrator never looks behind that trait.
//! - **Closed state set**: [`LifecycleState`] has exactly nine values and
//!   every registered subsystem occupies exactly one of them.
//! - **Injected observability**: Lifecycle events flow to an [`EventSink`]
//!   handed to each component at construction, never to a global logger.

pub mod entities;
pub mod events;
pub mod sinks;
pub mod subsystem_trait;

pub use entities::*;
pub use events::{
    EventSink, LifecycleEvent, PhaseOutcome, RecoveryPath, Severity, ORCHESTRATOR_SUBJECT,
};
pub use sinks::{MemorySink, TracingSink};
pub use subsystem_trait::{DynSubsystem, Subsystem, SubsystemError, SubsystemErrorKind};
