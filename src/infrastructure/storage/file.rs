//! JSON file snapshot store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::SnapshotStore;
use crate::domain::ClubState;
use crate::support::errors::InfraError;

/// Stores the snapshot as one pretty-printed JSON file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Option<ClubState>, InfraError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot loaded");
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, state: &ClubState) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot saved");
        Ok(())
    }
}
