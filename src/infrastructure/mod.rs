//! Infrastructure: persistence, credentials and collaborator stand-ins

pub mod collaborators;
pub mod crypto;
pub mod storage;

pub use collaborators::{DniParitySocioVerifier, SimulatedGateway};
pub use storage::{InMemorySnapshotStore, JsonFileSnapshotStore, SnapshotStore};
