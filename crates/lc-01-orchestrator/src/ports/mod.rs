//! Ports module for the Lifecycle Orchestrator
//!
//! The outbound side (event reporting) is `shared_types::EventSink`, shared
//! with the validator.

pub mod inbound;

pub use inbound::LifecycleOrchestratorApi;
