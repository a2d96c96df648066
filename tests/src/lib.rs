//! # Lifecycle-Kernel Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs         # Scriptable subsystem shared by the flows
//!     ├── lifecycle_flows.rs  # Ordering, fail-fast startup, checkpoints, teardown
//!     ├── recovery_flows.rs   # Reconcile/reinitialize escalation and the attempt ceiling
//!     └── validation_gate.rs  # Validator over live orchestrator status, runtime gate
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p lc-tests
//!
//! # By area
//! cargo test -p lc-tests integration::recovery_flows::
//! ```

pub mod integration;
