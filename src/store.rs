use std::collections::BTreeMap;

use thiserror::Error;

use crate::spec::{AgentSpec, SpecId, SpecPatch};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("specification {0} not found")]
    NotFound(SpecId),
    #[error("specification service unavailable: {0}")]
    Unavailable(String),
    #[error("update rejected: {0}")]
    Rejected(String),
}

/// Notification from the surrounding application that a specification
/// changed outside the diagram (the only coupling to the conversational
/// subsystem).
#[derive(Debug, Clone)]
pub enum SpecEvent {
    /// The updated document was pushed along with the notification.
    Changed(AgentSpec),
    /// Only the id was pushed; the controller re-fetches.
    Invalidated(SpecId),
}

/// The remote specification service, behind a trait so the engine stays
/// transport-agnostic. `update` takes a sparse patch; the service owns merge
/// semantics and its response replaces local state wholesale.
pub trait SpecStore {
    fn fetch(&mut self, id: &SpecId) -> Result<AgentSpec, StoreError>;
    fn update(&mut self, id: &SpecId, patch: &SpecPatch) -> Result<AgentSpec, StoreError>;
}

/// In-memory reference store used by tests and the CLI. Supports scripted
/// failure of the next update to exercise rollback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    specs: BTreeMap<SpecId, AgentSpec>,
    fail_next_update: Option<StoreError>,
    pub update_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(id: impl Into<SpecId>, spec: AgentSpec) -> Self {
        let mut store = Self::default();
        store.specs.insert(id.into(), spec);
        store
    }

    pub fn insert(&mut self, id: impl Into<SpecId>, spec: AgentSpec) {
        self.specs.insert(id.into(), spec);
    }

    pub fn fail_next_update(&mut self, error: StoreError) {
        self.fail_next_update = Some(error);
    }

    pub fn get(&self, id: &str) -> Option<&AgentSpec> {
        self.specs.get(id)
    }
}

impl SpecStore for MemoryStore {
    fn fetch(&mut self, id: &SpecId) -> Result<AgentSpec, StoreError> {
        self.specs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn update(&mut self, id: &SpecId, patch: &SpecPatch) -> Result<AgentSpec, StoreError> {
        self.update_calls += 1;
        if let Some(error) = self.fail_next_update.take() {
            return Err(error);
        }
        let spec = self
            .specs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        spec.apply_patch(patch);
        spec.revision += 1;
        Ok(spec.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_applies_patch_and_bumps_revision() {
        let mut store = MemoryStore::with_spec("s1", AgentSpec::default());
        let patch = SpecPatch {
            name: Some("Renamed".to_string()),
            ..SpecPatch::default()
        };
        let updated = store.update(&"s1".to_string(), &patch).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.revision, 1);
    }

    #[test]
    fn scripted_failure_fires_once() {
        let mut store = MemoryStore::with_spec("s1", AgentSpec::default());
        store.fail_next_update(StoreError::Unavailable("502".to_string()));
        let patch = SpecPatch::default();
        assert!(store.update(&"s1".to_string(), &patch).is_err());
        assert!(store.update(&"s1".to_string(), &patch).is_ok());
    }

    #[test]
    fn fetch_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.fetch(&"missing".to_string()),
            Err(StoreError::NotFound("missing".to_string()))
        );
    }
}
