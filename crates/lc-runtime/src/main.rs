//! # Lifecycle-Kernel Runtime
//!
//! ## Startup Sequence
//!
//! 1. Install telemetry (from environment)
//! 2. Load configuration (file named by the first argument or `LC_CONFIG`,
//!    then `LC_*` overrides)
//! 3. Register subsystems, initialize, validate, run the validation gate
//! 4. Periodic health and checkpoint passes
//! 5. Ctrl+C: stop the passes, terminate in reverse dependency order

use anyhow::{Context, Result};
use lc_runtime::{LifecycleRuntime, RuntimeConfig};
use lc_telemetry::{init_telemetry, TelemetryConfig};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_args_and_env().context("Failed to load configuration")?;
    info!(
        monitor_interval_secs = config.monitor_interval_secs,
        checkpoint_interval_secs = config.checkpoint_interval_secs,
        max_recovery_attempts = config.orchestrator.max_recovery_attempts,
        "Configuration loaded"
    );

    let runtime = LifecycleRuntime::new(config)?;
    runtime.start().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let run_loop = tokio::spawn({
        let runtime = runtime.clone();
        async move { runtime.run(shutdown_rx).await }
    });

    info!("Runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // The loop may already have stopped on an error; teardown runs either way
    let _ = shutdown_tx.send(true);
    let run_result = run_loop.await.context("Run loop panicked")?;

    runtime.shutdown().await?;
    run_result
}
