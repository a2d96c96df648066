//! Bounded recovery procedure
//!
//! ```text
//! failure ──→ FAILED, attempts += 1
//!               │
//!               ├── attempts > max ──→ Exhausted (stays FAILED, nothing called)
//!               │
//!               ├── reconcile() ok ──→ OPERATIONAL, attempts = 0
//!               │
//!               ├── initialize() ok (dependencies operational)
//!               │                  ──→ OPERATIONAL, attempts = 0
//!               │
//!               └── otherwise ──→ Failed (stays FAILED)
//! ```

use super::registry::Registry;
use super::service::Orchestrator;
use crate::domain::entities::RecoveryOutcome;
use crate::domain::errors::OrchestratorError;
use crate::domain::transitions::TransitionMode;
use shared_types::{LifecycleEvent, RecoveryPath};

impl Orchestrator {
    /// Run one recovery attempt for `name`.
    ///
    /// Caller holds the registry lock.
    pub(super) fn handle_failure(
        &self,
        reg: &mut Registry,
        name: &str,
    ) -> Result<RecoveryOutcome, OrchestratorError> {
        let attempts = {
            let record = reg.get_mut(name)?;
            self.mark_failed(record);
            record.recovery_attempts = record.recovery_attempts.saturating_add(1);
            record.recovery_attempts
        };

        if attempts > self.config().max_recovery_attempts {
            self.emit(LifecycleEvent::RecoveryExhausted {
                subsystem: name.to_string(),
                attempts,
            });
            return Ok(RecoveryOutcome::Exhausted { attempts });
        }

        self.emit(LifecycleEvent::RecoveryAttempt {
            subsystem: name.to_string(),
            attempt: attempts,
        });

        if self.reconcile_one(reg, name, TransitionMode::Recovery)? {
            self.recovered(reg, name, RecoveryPath::Reconcile)?;
            return Ok(RecoveryOutcome::Reconciled);
        }

        if self.initialize_one(reg, name, TransitionMode::Recovery) {
            self.recovered(reg, name, RecoveryPath::Reinitialize)?;
            return Ok(RecoveryOutcome::Reinitialized);
        }

        self.fault(name, "recover", format!("recovery attempt {attempts} failed"));
        Ok(RecoveryOutcome::Failed { attempts })
    }

    fn recovered(
        &self,
        reg: &mut Registry,
        name: &str,
        via: RecoveryPath,
    ) -> Result<(), OrchestratorError> {
        reg.get_mut(name)?.recovery_attempts = 0;
        self.emit(LifecycleEvent::Recovered {
            subsystem: name.to_string(),
            via,
        });
        Ok(())
    }
}
