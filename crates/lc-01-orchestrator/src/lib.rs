//! # LC-01: Lifecycle Orchestrator
//!
//! Registers independently implemented subsystems, resolves their startup
//! order from declared dependencies, drives each through the lifecycle
//! state machine, checkpoints them and recovers them when they fail.
//!
//! ## Architecture
//!
//! - **Domain**: Registration records, checkpoint ring, transition table,
//!   errors and ordering invariants
//! - **Algorithms**: Depth-first dependency resolution with cycle detection
//! - **Ports**: Inbound (`LifecycleOrchestratorApi`)
//! - **Application**: The `Orchestrator` service and its recovery procedure
//!
//! ## Control Flow
//!
//! ```text
//! register_subsystem × N
//!        │
//!        ↓
//! initialize_all ──(fail-fast)──→ orchestrator FAILED
//!        │
//!        ↓
//! validate_all ──(fail-fast)──→ false
//!        │
//!        ↓
//! operate / reconcile / checkpoint / monitor_health
//!        │            any failure ──→ bounded recovery
//!        ↓
//! terminate_all (reverse resolved order)
//! ```

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::service::Orchestrator;
pub use config::OrchestratorConfig;
pub use domain::entities::*;
pub use domain::errors::{DependencyError, OrchestratorError};
pub use ports::inbound::LifecycleOrchestratorApi;
