//! Stand-in implementations of the outbound ports

mod gateway;
mod socio;

pub use gateway::SimulatedGateway;
pub use socio::{socio_by_dni_parity, DniParitySocioVerifier};
