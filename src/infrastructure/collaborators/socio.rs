//! Stand-in membership registry

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{SocioStatus, SocioVerifier};
use crate::support::errors::AppError;

/// Classifies a DNI as an active member when its last character is an
/// even digit. Swap this out for the real registry client.
#[derive(Debug, Clone, Default)]
pub struct DniParitySocioVerifier {
    latency: Duration,
}

impl DniParitySocioVerifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Instant answers, for tests
    pub fn instant() -> Self {
        Self::default()
    }
}

pub fn socio_by_dni_parity(dni: &str) -> bool {
    dni.trim()
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d % 2 == 0)
        .unwrap_or(false)
}

#[async_trait]
impl SocioVerifier for DniParitySocioVerifier {
    async fn verify(&self, dni: &str) -> Result<SocioStatus, AppError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let socio_active = socio_by_dni_parity(dni);
        debug!(socio_active, "Socio lookup completed");
        Ok(SocioStatus { socio_active })
    }
}
