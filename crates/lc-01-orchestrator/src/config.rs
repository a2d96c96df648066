//! Configuration for the Lifecycle Orchestrator

use serde::{Deserialize, Serialize};

/// Ceiling on induced failures before recovery gives up.
pub const DEFAULT_MAX_RECOVERY_ATTEMPTS: u32 = 3;

/// Checkpoints retained per subsystem.
pub const DEFAULT_CHECKPOINT_CAPACITY: usize = 10;

/// Orchestrator configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Recovery runs while a subsystem's attempt counter is at or below this
    pub max_recovery_attempts: u32,
    /// Checkpoints retained per subsystem (oldest evicted first)
    pub checkpoint_capacity: usize,
    /// Reject dependencies on subsystems that were never registered.
    ///
    /// When false they are treated as soft dependencies and ignored.
    pub strict_dependencies: bool,
}

impl OrchestratorConfig {
    /// Checkpoint capacity with a floor of one slot.
    pub fn effective_checkpoint_capacity(&self) -> usize {
        self.checkpoint_capacity.max(1)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_recovery_attempts: DEFAULT_MAX_RECOVERY_ATTEMPTS,
            checkpoint_capacity: DEFAULT_CHECKPOINT_CAPACITY,
            strict_dependencies: false,
        }
    }
}
