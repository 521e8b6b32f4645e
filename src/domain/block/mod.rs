//! Maintenance block aggregate (BlockRegistry)

pub mod model;

pub use model::{Block, NewBlock, DEFAULT_BLOCK_REASON};
