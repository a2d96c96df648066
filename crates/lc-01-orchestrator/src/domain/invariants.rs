//! Domain invariants for dependency ordering

use std::collections::{HashMap, HashSet};

/// INVARIANT-1: Dependency Order
/// Every name appears after each of its registered dependencies. Applied to
/// every name, this also places it after its transitive dependencies.
pub fn invariant_dependency_order(
    order: &[String],
    dependencies: &HashMap<String, Vec<String>>,
) -> bool {
    let position: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    for (i, name) in order.iter().enumerate() {
        let Some(deps) = dependencies.get(name) else {
            continue;
        };
        for dep in deps {
            // Unregistered (soft) dependencies are not part of the order
            let Some(&dep_pos) = position.get(dep.as_str()) else {
                continue;
            };
            if dep_pos >= i {
                return false;
            }
        }
    }

    true
}

/// INVARIANT-2: Completeness
/// Every registered name is scheduled exactly once.
pub fn invariant_completeness(order: &[String], nodes: &[String]) -> bool {
    let scheduled: HashSet<&str> = order.iter().map(String::as_str).collect();
    let all: HashSet<&str> = nodes.iter().map(String::as_str).collect();

    scheduled.len() == order.len() && scheduled == all
}

/// INVARIANT-3: Reverse Teardown
/// Termination visits names in exactly the reverse of initialization order.
pub fn invariant_reverse_order(init_order: &[String], terminate_order: &[String]) -> bool {
    init_order.len() == terminate_order.len()
        && init_order.iter().rev().eq(terminate_order.iter())
}
