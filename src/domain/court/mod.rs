//! Court aggregate (CourtRegistry)

pub mod model;

pub use model::{default_courts, slot_times, Court, CourtAvailability};
