//! Simulated payment gateway

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::application::ports::PaymentGateway;
use crate::domain::GatewayReceipt;
use crate::support::errors::AppError;
use crate::support::id::{new_id, GATEWAY_OPERATION};

/// Approves every charge after an optional delay. There is no decline path.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, reservation_id: &str, amount: u64) -> Result<GatewayReceipt, AppError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let receipt = GatewayReceipt {
            operation_id: new_id(GATEWAY_OPERATION),
            approved_at: Utc::now(),
        };
        debug!(reservation_id, amount, operation_id = %receipt.operation_id, "Charge approved");
        Ok(receipt)
    }
}
