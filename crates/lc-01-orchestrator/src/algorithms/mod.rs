//! Algorithms module for the Lifecycle Orchestrator
//!
//! Contains:
//! - Depth-first dependency resolution with cycle detection

pub mod dependency_resolver;

pub use dependency_resolver::{resolve_dependencies, ResolvedOrder, SkippedDependency};
