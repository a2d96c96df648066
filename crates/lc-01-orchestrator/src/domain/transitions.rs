//! Lifecycle transition table
//!
//! ```text
//! uninitialized → initializing → operational | failed
//! terminated    → initializing
//! operational   → validating   → operational | failed
//! operational   → reconciling  → operational | failed
//! operational   → checkpointing → operational
//! operational   → terminating  → terminated
//! any           → failed
//! failed        → reconciling | initializing   (recovery procedure only)
//! ```

use shared_types::LifecycleState;

/// Who is asking for the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    /// Regular lifecycle call. Cannot leave `failed`.
    Normal,
    /// The recovery procedure. May additionally leave `failed`.
    Recovery,
}

/// Whether `from → to` is a legal transition in `mode`.
pub fn is_permitted(from: LifecycleState, to: LifecycleState, mode: TransitionMode) -> bool {
    use LifecycleState::*;

    if to == Failed {
        return from != Failed;
    }

    match (from, to) {
        (Uninitialized, Initializing) | (Terminated, Initializing) => true,
        (Initializing, Operational) => true,
        (Operational, Validating) | (Validating, Operational) => true,
        (Operational, Reconciling) | (Reconciling, Operational) => true,
        (Operational, Checkpointing) | (Checkpointing, Operational) => true,
        (Operational, Terminating) | (Terminating, Terminated) => true,
        (Failed, Reconciling) | (Failed, Initializing) => mode == TransitionMode::Recovery,
        _ => false,
    }
}

/// State a subsystem must be in before `to` can be entered normally.
///
/// Used to name the expected state in state errors.
pub fn expected_source(to: LifecycleState) -> LifecycleState {
    match to {
        LifecycleState::Initializing => LifecycleState::Uninitialized,
        LifecycleState::Terminated => LifecycleState::Terminating,
        _ => LifecycleState::Operational,
    }
}
