//! # Demo Subsystems
//!
//! Three small collaborators wired the way a real deployment would be:
//!
//! ```text
//! kv-store ←── template-renderer ←── heartbeat
//!     ↑                                  │
//!     └──────────────────────────────────┘
//! ```
//!
//! The store and the renderer share one entry map; the renderer fills
//! `{key}` placeholders from it.

use parking_lot::RwLock;
use serde_json::json;
use shared_types::{
    HealthReport, HealthStatus, Snapshot, Subsystem, SubsystemError, SubsystemErrorKind,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entry map shared by the store and the renderer.
pub type SharedEntries = Arc<RwLock<BTreeMap<String, String>>>;

/// Entries past this count report critical health.
pub const STORE_CAPACITY: usize = 1024;

// =============================================================================
// KEY-VALUE STORE
// =============================================================================

pub struct KvStore {
    name: String,
    entries: SharedEntries,
    ready: bool,
    writes: u64,
}

impl KvStore {
    pub fn new(name: &str, entries: SharedEntries) -> Self {
        Self {
            name: name.to_string(),
            entries,
            ready: false,
            writes: 0,
        }
    }

    fn not_ready(&self, kind: SubsystemErrorKind) -> SubsystemError {
        SubsystemError::new(&self.name, kind, "store is not initialized")
    }
}

impl Subsystem for KvStore {
    fn initialize(&mut self) -> Result<bool, SubsystemError> {
        self.entries
            .write()
            .entry("service".to_string())
            .or_insert_with(|| "lifecycle-kernel".to_string());
        self.ready = true;
        Ok(true)
    }

    fn validate(&mut self) -> Result<bool, SubsystemError> {
        Ok(self.ready && self.entries.read().len() <= STORE_CAPACITY)
    }

    fn operate(&mut self) -> Result<Snapshot, SubsystemError> {
        if !self.ready {
            return Err(self.not_ready(SubsystemErrorKind::RuntimeError));
        }
        self.writes += 1;
        let mut entries = self.entries.write();
        entries.insert("writes".to_string(), self.writes.to_string());
        Ok(json!({ "entries": entries.len(), "writes": self.writes }))
    }

    fn reconcile(&mut self) -> Result<bool, SubsystemError> {
        let mut entries = self.entries.write();
        entries.retain(|key, _| !key.trim().is_empty());
        self.ready = true;
        Ok(entries.len() <= STORE_CAPACITY)
    }

    fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
        if !self.ready {
            return Err(self.not_ready(SubsystemErrorKind::CheckpointFailed));
        }
        serde_json::to_value(&*self.entries.read()).map_err(|e| {
            SubsystemError::new(&self.name, SubsystemErrorKind::CheckpointFailed, e.to_string())
        })
    }

    fn terminate(&mut self) -> Result<bool, SubsystemError> {
        self.ready = false;
        Ok(true)
    }

    fn get_state(&self) -> Snapshot {
        json!({
            "ready": self.ready,
            "entries": self.entries.read().len(),
            "writes": self.writes,
        })
    }

    fn get_health(&self) -> Result<HealthReport, SubsystemError> {
        let len = self.entries.read().len();
        let status = if len > STORE_CAPACITY {
            HealthStatus::Critical
        } else if !self.ready {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        Ok(HealthReport::new(status).with_metrics(json!({
            "entries": len,
            "capacity": STORE_CAPACITY,
        })))
    }
}

// =============================================================================
// TEMPLATE RENDERER
// =============================================================================

pub struct TemplateRenderer {
    name: String,
    template: String,
    entries: SharedEntries,
    rendered: u64,
    missing: Vec<String>,
}

impl TemplateRenderer {
    pub fn new(name: &str, template: &str, entries: SharedEntries) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            entries,
            rendered: 0,
            missing: Vec::new(),
        }
    }

    /// Placeholder names in `template`, or `None` if a brace is unbalanced.
    fn placeholders(template: &str) -> Option<Vec<&str>> {
        let mut names = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after.find('}')?;
            if after[..close].contains('{') {
                return None;
            }
            names.push(&after[..close]);
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return None;
        }
        Some(names)
    }

    fn render(&self) -> (String, Vec<String>) {
        let entries = self.entries.read();
        let mut output = self.template.clone();
        let mut missing = Vec::new();
        for key in Self::placeholders(&self.template).unwrap_or_default() {
            match entries.get(key) {
                Some(value) => output = output.replace(&format!("{{{key}}}"), value),
                None => missing.push(key.to_string()),
            }
        }
        (output, missing)
    }
}

impl Subsystem for TemplateRenderer {
    fn initialize(&mut self) -> Result<bool, SubsystemError> {
        if Self::placeholders(&self.template).is_none() {
            return Err(SubsystemError::new(
                &self.name,
                SubsystemErrorKind::InitializationFailed,
                format!("unbalanced braces in template '{}'", self.template),
            ));
        }
        self.rendered = 0;
        self.missing.clear();
        Ok(true)
    }

    fn validate(&mut self) -> Result<bool, SubsystemError> {
        Ok(!self.template.is_empty())
    }

    fn operate(&mut self) -> Result<Snapshot, SubsystemError> {
        let (output, missing) = self.render();
        self.rendered += 1;
        self.missing = missing;
        Ok(json!({ "output": output, "missing": self.missing }))
    }

    fn reconcile(&mut self) -> Result<bool, SubsystemError> {
        self.missing.clear();
        Ok(true)
    }

    fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
        Ok(json!({ "template": self.template, "rendered": self.rendered }))
    }

    fn terminate(&mut self) -> Result<bool, SubsystemError> {
        Ok(true)
    }

    fn get_state(&self) -> Snapshot {
        json!({ "rendered": self.rendered, "missing": self.missing })
    }

    fn get_health(&self) -> Result<HealthReport, SubsystemError> {
        let status = if self.missing.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };
        Ok(HealthReport::new(status).with_metrics(json!({ "missing": self.missing.len() })))
    }
}

// =============================================================================
// HEARTBEAT
// =============================================================================

/// Counts beats while operational.
#[derive(Default)]
pub struct Heartbeat {
    beats: u64,
    running: bool,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Subsystem for Heartbeat {
    fn initialize(&mut self) -> Result<bool, SubsystemError> {
        self.running = true;
        Ok(true)
    }

    fn validate(&mut self) -> Result<bool, SubsystemError> {
        Ok(self.running)
    }

    fn operate(&mut self) -> Result<Snapshot, SubsystemError> {
        self.beats += 1;
        Ok(json!({ "beats": self.beats }))
    }

    fn reconcile(&mut self) -> Result<bool, SubsystemError> {
        self.running = true;
        Ok(true)
    }

    fn checkpoint(&self) -> Result<Snapshot, SubsystemError> {
        Ok(json!({ "beats": self.beats }))
    }

    fn terminate(&mut self) -> Result<bool, SubsystemError> {
        self.running = false;
        Ok(true)
    }

    fn get_state(&self) -> Snapshot {
        json!({ "beats": self.beats, "running": self.running })
    }

    fn get_health(&self) -> Result<HealthReport, SubsystemError> {
        Ok(HealthReport::healthy().with_metrics(json!({ "beats": self.beats })))
    }
}
