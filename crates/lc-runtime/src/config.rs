//! # Runtime Configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//!
//! ```toml
//! monitor_interval_secs = 5
//! checkpoint_interval_secs = 30
//!
//! [orchestrator]
//! max_recovery_attempts = 3
//! checkpoint_capacity = 10
//! strict_dependencies = false
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `LC_CONFIG` | Config file path (first CLI argument wins) |
//! | `LC_MAX_RECOVERY_ATTEMPTS` | `orchestrator.max_recovery_attempts` |
//! | `LC_CHECKPOINT_CAPACITY` | `orchestrator.checkpoint_capacity` |
//! | `LC_STRICT_DEPENDENCIES` | `orchestrator.strict_dependencies` |
//! | `LC_MONITOR_INTERVAL_SECS` | `monitor_interval_secs` |
//! | `LC_CHECKPOINT_INTERVAL_SECS` | `checkpoint_interval_secs` |

use lc_01_orchestrator::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CHECKPOINT_INTERVAL_SECS: u64 = 30;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Orchestrator settings.
    pub orchestrator: OrchestratorConfig,
    /// Seconds between `monitor_health` passes.
    pub monitor_interval_secs: u64,
    /// Seconds between `checkpoint_all` passes.
    pub checkpoint_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            monitor_interval_secs: DEFAULT_MONITOR_INTERVAL_SECS,
            checkpoint_interval_secs: DEFAULT_CHECKPOINT_INTERVAL_SECS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },
    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// A value that parsed but is unusable, or an unparsable override.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// File named by the first CLI argument or `LC_CONFIG` (defaults if
    /// neither is set), then environment overrides, then validation.
    pub fn from_args_and_env() -> Result<Self, ConfigError> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("LC_CONFIG").ok());

        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LC_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = parse_var(&lookup, "LC_MAX_RECOVERY_ATTEMPTS")? {
            self.orchestrator.max_recovery_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "LC_CHECKPOINT_CAPACITY")? {
            self.orchestrator.checkpoint_capacity = v;
        }
        if let Some(v) = parse_var(&lookup, "LC_STRICT_DEPENDENCIES")? {
            self.orchestrator.strict_dependencies = v;
        }
        if let Some(v) = parse_var(&lookup, "LC_MONITOR_INTERVAL_SECS")? {
            self.monitor_interval_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "LC_CHECKPOINT_INTERVAL_SECS")? {
            self.checkpoint_interval_secs = v;
        }
        Ok(())
    }

    /// Reject values the runtime cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "monitor_interval_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.checkpoint_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "checkpoint_interval_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    pub fn checkpoint_interval(&self) -> Duration {
        Duration::from_secs(self.checkpoint_interval_secs)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        })
}
