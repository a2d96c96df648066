//! Subsystem registry
//!
//! One record per registered name, kept in registration order. Each name
//! maps to exactly one record, so every registered subsystem has exactly
//! one lifecycle state.

use crate::domain::entities::RegistrationRecord;
use crate::domain::errors::OrchestratorError;
use shared_types::LifecycleState;
use std::collections::HashMap;

pub(crate) struct Registry {
    records: Vec<RegistrationRecord>,
    /// Name -> position in `records`
    index: HashMap<String, usize>,
    /// Aggregate state of the orchestrator itself
    pub(crate) orchestrator_state: LifecycleState,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            orchestrator_state: LifecycleState::Uninitialized,
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn insert(&mut self, record: RegistrationRecord) -> Result<(), OrchestratorError> {
        if self.contains(&record.name) {
            return Err(OrchestratorError::AlreadyRegistered { name: record.name });
        }
        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Result<&RegistrationRecord, OrchestratorError> {
        self.index
            .get(name)
            .map(|&i| &self.records[i])
            .ok_or_else(|| OrchestratorError::UnknownSubsystem {
                name: name.to_string(),
            })
    }

    pub(crate) fn get_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut RegistrationRecord, OrchestratorError> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.records[i]),
            None => Err(OrchestratorError::UnknownSubsystem {
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn state_of(&self, name: &str) -> Option<LifecycleState> {
        self.get(name).ok().map(|record| record.state)
    }

    /// Registered names in registration order.
    pub(crate) fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub(crate) fn dependency_map(&self) -> HashMap<String, Vec<String>> {
        self.records
            .iter()
            .map(|r| (r.name.clone(), r.dependencies.clone()))
            .collect()
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &RegistrationRecord> {
        self.records.iter()
    }
}
