//! Core entities for the System Validator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Snapshot;
use std::fmt;

/// Predicate evaluated against a state snapshot.
///
/// `Err` means the predicate could not evaluate the snapshot; the rule is
/// then recorded as failed with the error text.
pub type RulePredicate = Box<dyn Fn(&Snapshot) -> Result<RuleOutcome, String> + Send + Sync>;

/// A named rule.
pub struct ValidationRule {
    pub(crate) name: String,
    pub(crate) predicate: RulePredicate,
    /// Failure blocks the validated operation
    pub(crate) critical: bool,
}

impl ValidationRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub(crate) fn evaluate(&self, state: &Snapshot) -> RuleResult {
        let outcome = (self.predicate)(state).unwrap_or_else(RuleOutcome::fail);
        RuleResult {
            rule: self.name.clone(),
            valid: outcome.valid,
            message: outcome.message,
            critical: self.critical,
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("critical", &self.critical)
            .finish_non_exhaustive()
    }
}

/// What a predicate returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub valid: bool,
    pub message: String,
}

impl RuleOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// One rule's result within a validation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: String,
    pub valid: bool,
    pub message: String,
    pub critical: bool,
}

impl RuleResult {
    pub fn is_blocking(&self) -> bool {
        self.critical && !self.valid
    }
}

/// One entry of the validation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub timestamp: DateTime<Utc>,
    /// Every rule's result, in registration order
    pub results: Vec<RuleResult>,
    /// True iff no critical rule failed
    pub passed: bool,
}

impl ValidationRecord {
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> + '_ {
        self.results.iter().filter(|r| !r.valid)
    }

    pub fn critical_failures(&self) -> impl Iterator<Item = &RuleResult> + '_ {
        self.results.iter().filter(|r| r.is_blocking())
    }
}
