//! Domain module for the Lifecycle Orchestrator
//!
//! Contains registration records, the checkpoint ring, the transition
//! table, errors, and ordering invariants.

pub mod checkpoint_ring;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod transitions;

pub use checkpoint_ring::CheckpointRing;
pub use entities::*;
pub use errors::*;
pub use transitions::TransitionMode;
