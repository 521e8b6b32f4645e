//! Booking policy aggregate (ConfigStore)

pub mod model;

pub use model::{AuthMode, ClubPolicy, PolicyPatch};
