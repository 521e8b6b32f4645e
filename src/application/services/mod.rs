//! Application services

mod club;
mod queries;
mod tx;

pub use club::{AccountValidation, ClubService, ClubServiceBuilder, ManualReservation, ServiceSettings};
pub use queries::CourtSlot;
