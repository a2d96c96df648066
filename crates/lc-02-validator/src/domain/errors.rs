//! Error types for the System Validator

use super::entities::RuleResult;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// At least one critical rule failed. Only critical failures are listed.
    #[error("Critical validation failures:\n{}", list_failures(.failures))]
    CriticalFailures { failures: Vec<RuleResult> },
}

impl ValidationError {
    pub fn failures(&self) -> &[RuleResult] {
        match self {
            Self::CriticalFailures { failures } => failures,
        }
    }
}

fn list_failures(failures: &[RuleResult]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {}: {}", f.rule, f.message))
        .collect::<Vec<_>>()
        .join("\n")
}
