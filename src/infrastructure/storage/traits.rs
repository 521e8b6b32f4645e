//! Snapshot persistence contract

use async_trait::async_trait;

use crate::domain::ClubState;
use crate::support::errors::InfraError;

/// Name of the blob holding the club state
pub const SNAPSHOT_KEY: &str = "court_booking_state_v1";

/// Durable home of the whole [`ClubState`].
///
/// The state is always written in full; there are no partial updates and
/// no schema versioning.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved state, or `None` on a fresh installation.
    async fn load(&self) -> Result<Option<ClubState>, InfraError>;

    /// Overwrite the saved state.
    async fn save(&self, state: &ClubState) -> Result<(), InfraError>;
}
