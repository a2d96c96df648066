//! Application layer for the Lifecycle Orchestrator
//!
//! Contains the `Orchestrator` service, its registry, and the bounded
//! recovery procedure.

mod recovery;
pub(crate) mod registry;
pub mod service;

#[cfg(test)]
pub(crate) mod mocks;

pub use service::Orchestrator;
