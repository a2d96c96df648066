//! # Lifecycle Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `lc-runtime` binary.
//!
//! - `config/` - TOML + environment configuration
//! - `container/` - Demo subsystems and their registration
//! - `runtime` - Startup, validation gate, periodic passes, shutdown

pub mod config;
pub mod container;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use runtime::LifecycleRuntime;
