//! # Subsystem Container
//!
//! Builds an orchestrator and registers the demo subsystems with their
//! dependencies.

pub mod subsystems;

use lc_01_orchestrator::{
    LifecycleOrchestratorApi, Orchestrator, OrchestratorConfig, OrchestratorError,
};
use parking_lot::RwLock;
use shared_types::EventSink;
use std::collections::BTreeMap;
use std::sync::Arc;
use subsystems::{Heartbeat, KvStore, SharedEntries, TemplateRenderer};

pub const KV_STORE: &str = "kv-store";
pub const TEMPLATE_RENDERER: &str = "template-renderer";
pub const HEARTBEAT: &str = "heartbeat";

/// Template rendered by the demo renderer.
pub const STATUS_TEMPLATE: &str = "{service} has written {writes} times";

/// Orchestrator with the demo subsystems registered, not yet initialized.
pub fn build_orchestrator(
    config: OrchestratorConfig,
    sink: Arc<dyn EventSink>,
) -> Result<Orchestrator, OrchestratorError> {
    let orchestrator = Orchestrator::new(config, sink);
    let entries: SharedEntries = Arc::new(RwLock::new(BTreeMap::new()));

    orchestrator.register_subsystem(
        KV_STORE,
        Box::new(KvStore::new(KV_STORE, Arc::clone(&entries))),
        &[],
    )?;
    orchestrator.register_subsystem(
        TEMPLATE_RENDERER,
        Box::new(TemplateRenderer::new(
            TEMPLATE_RENDERER,
            STATUS_TEMPLATE,
            entries,
        )),
        &[KV_STORE],
    )?;
    orchestrator.register_subsystem(
        HEARTBEAT,
        Box::new(Heartbeat::new()),
        &[KV_STORE, TEMPLATE_RENDERER],
    )?;

    Ok(orchestrator)
}
