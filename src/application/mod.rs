pub mod ports;
pub mod services;

// Re-export key types for convenience
pub use ports::{PaymentGateway, SocioStatus, SocioVerifier};
pub use services::{
    AccountValidation, ClubService, ClubServiceBuilder, CourtSlot, ManualReservation,
    ServiceSettings,
};
