//! In-memory snapshot store for development and testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SnapshotStore, SNAPSHOT_KEY};
use crate::domain::ClubState;
use crate::support::errors::InfraError;

/// Keeps serialized snapshots in a map keyed by blob name, so the JSON
/// round trip is exercised exactly as with the file store.
pub struct InMemorySnapshotStore {
    blobs: DashMap<String, String>,
    saves: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            blobs: DashMap::new(),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<ClubState>, InfraError> {
        match self.blobs.get(SNAPSHOT_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(raw.value())?)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &ClubState) -> Result<(), InfraError> {
        let raw = serde_json::to_string(state)?;
        self.blobs.insert(SNAPSHOT_KEY.to_string(), raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
