//! # LC-02: System Validator
//!
//! Named-rule engine that checks a state snapshot and separates blocking
//! (critical) failures from advisory ones. Every run is kept in history.
//!
//! ## Architecture
//!
//! - **Domain**: Rules, per-rule results, validation records, errors
//! - **Application**: The `SystemValidator` service
//! - **Rules**: Standard rule set over the orchestrator's status snapshot
//!
//! ## Evaluation
//!
//! ```text
//! validate_system(snapshot)
//!        │
//!        ├── every rule, registration order
//!        │      Ok(valid)   → result recorded
//!        │      Err(message) → recorded as invalid
//!        │
//!        ├── record appended to history (passed = no critical failure)
//!        │
//!        └── any critical failure → Err(CriticalFailures)
//! ```

pub mod application;
pub mod domain;
pub mod rules;

pub use application::service::{SystemValidator, DEFAULT_HISTORY_CAPACITY};
pub use domain::entities::*;
pub use domain::errors::ValidationError;
pub use rules::standard_rules;
