//! # Lifecycle Telemetry
//!
//! Process-wide `tracing` subscriber for Lifecycle-Kernel binaries.
//! Libraries never install a subscriber; they report through an
//! `EventSink`, whose default implementation logs through `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Lifecycle events are now written to stdout
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `LC_JSON_LOGS` | `false` | JSON formatted output |
//! | `LC_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |
//! | `OTEL_SERVICE_NAME` / `LC_SERVICE_NAME` | `lifecycle-kernel` | Service name attached to the startup line |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_telemetry;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
