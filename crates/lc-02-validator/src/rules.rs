//! Standard rule set over the orchestrator's status snapshot
//!
//! The rules read the JSON form of the orchestrator's system status:
//!
//! ```text
//! {
//!   "orchestrator_state": "operational",
//!   "subsystems": {
//!     "<name>": { "state": "...", "recovery_attempts": 0, ... }
//!   },
//!   "timestamp": "..."
//! }
//! ```
//!
//! A snapshot missing those fields makes the rules fail with a message
//! naming the missing field.

use crate::application::service::SystemValidator;
use crate::domain::entities::RuleOutcome;
use serde_json::{Map, Value};
use shared_types::{LifecycleState, Snapshot};

pub const ORCHESTRATOR_OPERATIONAL: &str = "orchestrator_operational";
pub const NO_FAILED_SUBSYSTEMS: &str = "no_failed_subsystems";
pub const ALL_SUBSYSTEMS_OPERATIONAL: &str = "all_subsystems_operational";
pub const RECOVERY_BUDGET_HEALTHY: &str = "recovery_budget_healthy";

/// Register the standard rules on `validator`.
pub fn standard_rules(validator: &mut SystemValidator) {
    validator.add_rule(ORCHESTRATOR_OPERATIONAL, orchestrator_operational, true);
    validator.add_rule(NO_FAILED_SUBSYSTEMS, no_failed_subsystems, true);
    validator.add_rule(ALL_SUBSYSTEMS_OPERATIONAL, all_subsystems_operational, false);
    validator.add_rule(RECOVERY_BUDGET_HEALTHY, recovery_budget_healthy, false);
}

fn subsystems(state: &Snapshot) -> Result<&Map<String, Value>, String> {
    state
        .get("subsystems")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing field 'subsystems'".to_string())
}

fn state_of<'a>(name: &str, entry: &'a Value) -> Result<&'a str, String> {
    entry
        .get("state")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("subsystem '{name}' has no state"))
}

/// Names whose state matches `keep`, sorted.
fn names_where(
    state: &Snapshot,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<String>, String> {
    let mut names = Vec::new();
    for (name, entry) in subsystems(state)? {
        if keep(state_of(name, entry)?) {
            names.push(name.clone());
        }
    }
    Ok(names)
}

fn orchestrator_operational(state: &Snapshot) -> Result<RuleOutcome, String> {
    let current = state
        .get("orchestrator_state")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing field 'orchestrator_state'".to_string())?;

    if current == LifecycleState::Operational.as_str() {
        Ok(RuleOutcome::pass("orchestrator is operational"))
    } else {
        Ok(RuleOutcome::fail(format!("orchestrator is {current}")))
    }
}

fn no_failed_subsystems(state: &Snapshot) -> Result<RuleOutcome, String> {
    let failed = names_where(state, |s| s == LifecycleState::Failed.as_str())?;
    if failed.is_empty() {
        Ok(RuleOutcome::pass("no failed subsystems"))
    } else {
        Ok(RuleOutcome::fail(format!("failed: {}", failed.join(", "))))
    }
}

fn all_subsystems_operational(state: &Snapshot) -> Result<RuleOutcome, String> {
    let others = names_where(state, |s| s != LifecycleState::Operational.as_str())?;
    if others.is_empty() {
        Ok(RuleOutcome::pass("all subsystems operational"))
    } else {
        Ok(RuleOutcome::fail(format!(
            "not operational: {}",
            others.join(", ")
        )))
    }
}

fn recovery_budget_healthy(state: &Snapshot) -> Result<RuleOutcome, String> {
    let mut recovering = Vec::new();
    for (name, entry) in subsystems(state)? {
        let attempts = entry
            .get("recovery_attempts")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if attempts > 0 {
            recovering.push(format!("{name} ({attempts})"));
        }
    }

    if recovering.is_empty() {
        Ok(RuleOutcome::pass("no pending recovery attempts"))
    } else {
        Ok(RuleOutcome::fail(format!(
            "recovery attempts pending: {}",
            recovering.join(", ")
        )))
    }
}
