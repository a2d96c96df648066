//! # Lifecycle Runtime
//!
//! ## Startup Sequence
//!
//! 1. `initialize_all` in dependency order
//! 2. `validate_all`
//! 3. Validation gate: standard rules over `system_status()`
//!
//! Any failure tears everything down and aborts startup.
//!
//! ## Run Loop
//!
//! `monitor_health` and `checkpoint_all` on independent intervals until the
//! shutdown signal flips, then `terminate_all`.

use crate::config::RuntimeConfig;
use crate::container::build_orchestrator;
use anyhow::{bail, Context, Result};
use lc_01_orchestrator::{LifecycleOrchestratorApi, Orchestrator};
use lc_02_validator::{standard_rules, SystemValidator};
use parking_lot::Mutex;
use shared_types::{EventSink, HealthStatus, TracingSink};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Bootstrapper around one orchestrator and its validation gate.
#[derive(Clone)]
pub struct LifecycleRuntime {
    config: RuntimeConfig,
    orchestrator: Arc<Orchestrator>,
    validator: Arc<Mutex<SystemValidator>>,
}

impl LifecycleRuntime {
    /// Runtime reporting through `tracing`.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(TracingSink::new()))
    }

    pub fn with_sink(config: RuntimeConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let orchestrator = build_orchestrator(config.orchestrator.clone(), Arc::clone(&sink))
            .context("Failed to register subsystems")?;

        let mut validator = SystemValidator::new(sink);
        standard_rules(&mut validator);

        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
            validator: Arc::new(Mutex::new(validator)),
        })
    }

    pub fn orchestrator(&self) -> Arc<Orchestrator> {
        Arc::clone(&self.orchestrator)
    }

    pub fn validator(&self) -> Arc<Mutex<SystemValidator>> {
        Arc::clone(&self.validator)
    }

    /// Run a synchronous orchestrator call off the async worker threads.
    async fn blocking<T, F>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Orchestrator) -> T + Send + 'static,
    {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::task::spawn_blocking(move || call(orchestrator.as_ref()))
            .await
            .context("Orchestrator task panicked")
    }

    /// Bring every subsystem to operational and pass the validation gate.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Lifecycle-Kernel Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let initialized = self
            .blocking(|o| o.initialize_all())
            .await?
            .context("Dependency resolution failed")?;
        if !initialized {
            self.abort_startup().await;
            bail!("Subsystem initialization failed");
        }

        if !self.blocking(|o| o.validate_all()).await? {
            self.abort_startup().await;
            bail!("Subsystem validation failed");
        }

        if let Err(e) = self.validate_status() {
            self.abort_startup().await;
            return Err(e).context("System validation gate failed");
        }

        info!(
            subsystems = self.orchestrator.subsystem_names().len(),
            "All subsystems operational"
        );
        Ok(())
    }

    /// Validate the current system status with the standard rules.
    pub fn validate_status(&self) -> Result<(), lc_02_validator::ValidationError> {
        let snapshot = self.orchestrator.system_status().to_snapshot();
        self.validator.lock().validate_system(&snapshot)
    }

    async fn abort_startup(&self) {
        error!("Startup aborted, terminating subsystems");
        if let Err(e) = self.shutdown().await {
            error!("Teardown after failed startup also failed: {e:#}");
        }
    }

    /// Periodic health and checkpoint passes until `shutdown` flips to true.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut monitor = interval(self.config.monitor_interval());
        monitor.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut checkpoint = interval(self.config.checkpoint_interval());
        checkpoint.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = monitor.tick() => self.monitor_pass().await?,
                _ = checkpoint.tick() => self.checkpoint_pass().await?,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Run loop stopped");
        Ok(())
    }

    async fn monitor_pass(&self) -> Result<()> {
        let reports = self.blocking(|o| o.monitor_health()).await?;
        for (name, report) in &reports {
            if report.status != HealthStatus::Healthy {
                warn!(subsystem = %name, status = %report.status, "Subsystem not healthy");
            }
        }
        if let Err(e) = self.validate_status() {
            warn!("{e}");
        }
        Ok(())
    }

    async fn checkpoint_pass(&self) -> Result<()> {
        if !self.blocking(|o| o.checkpoint_all()).await? {
            warn!("Some checkpoints could not be taken");
        }
        Ok(())
    }

    /// Terminate every subsystem in reverse dependency order.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Initiating graceful shutdown...");
        let clean = self
            .blocking(|o| o.terminate_all())
            .await?
            .context("Dependency resolution failed during shutdown")?;
        if clean {
            info!("Shutdown complete");
        } else {
            warn!("Shutdown finished with subsystems left running");
        }
        Ok(())
    }
}
