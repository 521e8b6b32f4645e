//! Snapshot storage traits and implementations

mod file;
mod memory;
mod traits;

pub use file::JsonFileSnapshotStore;
pub use memory::InMemorySnapshotStore;
pub use traits::{SnapshotStore, SNAPSHOT_KEY};
