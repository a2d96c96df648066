//! Depth-first topological sort over subsystem dependencies
//!
//! A node is temp-marked while its dependencies are being visited. Reaching
//! a temp-marked node again means a cycle, and the whole resolution fails;
//! no partial order is returned. Nodes are visited in registration order and
//! dependencies in declaration order, so equal input gives equal output.

use crate::domain::errors::DependencyError;
use std::collections::{HashMap, HashSet};

/// A dependency on a name that was never registered, ignored in soft mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDependency {
    pub subsystem: String,
    pub dependency: String,
}

/// Output of [`resolve_dependencies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOrder {
    /// Initialization order; every name follows all of its dependencies
    pub order: Vec<String>,
    /// Unregistered dependencies that were skipped
    pub skipped: Vec<SkippedDependency>,
}

/// Resolve an initialization order for `nodes`.
///
/// `dependencies` maps a node to the names it depends on. A dependency that
/// is not in `nodes` is skipped and reported, unless `strict` is set, in
/// which case it fails resolution.
pub fn resolve_dependencies(
    nodes: &[String],
    dependencies: &HashMap<String, Vec<String>>,
    strict: bool,
) -> Result<ResolvedOrder, DependencyError> {
    let registered: HashSet<&str> = nodes.iter().map(String::as_str).collect();

    let mut resolver = Resolver {
        registered,
        dependencies,
        strict,
        visited: HashSet::new(),
        temp_mark: HashSet::new(),
        stack: Vec::new(),
        result: ResolvedOrder::default(),
    };

    for name in nodes {
        if !resolver.visited.contains(name.as_str()) {
            resolver.visit(name)?;
        }
    }

    Ok(resolver.result)
}

struct Resolver<'a> {
    registered: HashSet<&'a str>,
    dependencies: &'a HashMap<String, Vec<String>>,
    strict: bool,
    visited: HashSet<&'a str>,
    temp_mark: HashSet<&'a str>,
    /// Current DFS path, for cycle reporting
    stack: Vec<&'a str>,
    result: ResolvedOrder,
}

impl<'a> Resolver<'a> {
    fn visit(&mut self, name: &'a str) -> Result<(), DependencyError> {
        if self.temp_mark.contains(name) {
            let start = self.stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut path: Vec<String> = self.stack[start..].iter().map(|n| n.to_string()).collect();
            path.push(name.to_string());
            return Err(DependencyError::CycleDetected {
                name: name.to_string(),
                path,
            });
        }
        if self.visited.contains(name) {
            return Ok(());
        }

        self.temp_mark.insert(name);
        self.stack.push(name);

        let dependencies = self.dependencies;
        if let Some(deps) = dependencies.get(name) {
            for dep in deps {
                if self.registered.contains(dep.as_str()) {
                    self.visit(dep)?;
                    continue;
                }
                if self.strict {
                    return Err(DependencyError::Unregistered {
                        subsystem: name.to_string(),
                        dependency: dep.clone(),
                    });
                }
                self.result.skipped.push(SkippedDependency {
                    subsystem: name.to_string(),
                    dependency: dep.clone(),
                });
            }
        }

        self.stack.pop();
        self.temp_mark.remove(name);
        self.visited.insert(name);
        self.result.order.push(name.to_string());
        Ok(())
    }
}
