//! Outbound ports: external collaborators the booking engine calls
//!
//! Both calls are suspension points. The store is not locked while they
//! are in flight; the command re-validates against the latest state when
//! it commits.

use async_trait::async_trait;

use crate::domain::GatewayReceipt;
use crate::support::errors::AppError;

/// Result of a membership lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocioStatus {
    pub socio_active: bool,
}

/// Membership registry lookup, used only at registration.
#[async_trait]
pub trait SocioVerifier: Send + Sync {
    async fn verify(&self, dni: &str) -> Result<SocioStatus, AppError>;
}

/// Online payment provider.
///
/// An `Err` leaves the reservation in `PendingPayment`; the caller retries.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, reservation_id: &str, amount: u64) -> Result<GatewayReceipt, AppError>;
}
