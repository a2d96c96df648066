//! System Validator Service

use crate::domain::entities::{RuleOutcome, RuleResult, ValidationRecord, ValidationRule};
use crate::domain::errors::ValidationError;
use chrono::Utc;
use shared_types::{EventSink, LifecycleEvent, Snapshot, TracingSink};
use std::sync::Arc;

/// Validation runs retained before the oldest is dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Rule-based state validator.
///
/// Rules are independent; they run in registration order and never see each
/// other's results.
pub struct SystemValidator {
    rules: Vec<ValidationRule>,
    history: Vec<ValidationRecord>,
    history_capacity: usize,
    sink: Arc<dyn EventSink>,
}

impl SystemValidator {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            rules: Vec::new(),
            history: Vec::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sink,
        }
    }

    /// Retain at most `capacity` runs (at least one).
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self.trim_history();
        self
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.history_capacity {
            let excess = self.history.len() - self.history_capacity;
            self.history.drain(..excess);
        }
    }

    /// Validator reporting through `tracing`.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(TracingSink::new()))
    }

    /// Register a rule. Names are not required to be unique.
    pub fn add_rule<F>(&mut self, name: impl Into<String>, predicate: F, critical: bool)
    where
        F: Fn(&Snapshot) -> Result<RuleOutcome, String> + Send + Sync + 'static,
    {
        self.rules.push(ValidationRule {
            name: name.into(),
            predicate: Box::new(predicate),
            critical,
        });
    }

    /// Run every rule against `state` and append the run to history,
    /// dropping the oldest run once history is at capacity.
    ///
    /// Fails only if a critical rule failed; advisory failures are recorded
    /// and reported but never returned.
    pub fn validate_system(&mut self, state: &Snapshot) -> Result<(), ValidationError> {
        let results: Vec<RuleResult> =
            self.rules.iter().map(|rule| rule.evaluate(state)).collect();

        for result in results.iter().filter(|r| !r.valid) {
            self.sink.emit(LifecycleEvent::RuleFailed {
                rule: result.rule.clone(),
                critical: result.critical,
                message: result.message.clone(),
            });
        }

        let critical_failures: Vec<RuleResult> =
            results.iter().filter(|r| r.is_blocking()).cloned().collect();
        let passed = critical_failures.is_empty();
        let rules_checked = results.len();

        self.history.push(ValidationRecord {
            timestamp: Utc::now(),
            results,
            passed,
        });
        self.trim_history();
        self.sink.emit(LifecycleEvent::ValidationCompleted {
            rules_checked,
            passed,
        });

        if passed {
            Ok(())
        } else {
            Err(ValidationError::CriticalFailures {
                failures: critical_failures,
            })
        }
    }

    /// Retained runs, oldest first.
    pub fn history(&self) -> &[ValidationRecord] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&ValidationRecord> {
        self.history.last()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for SystemValidator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
