pub mod outbound;

pub use outbound::{PaymentGateway, SocioStatus, SocioVerifier};
