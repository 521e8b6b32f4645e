//! Notification intents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::support::id::{new_id, NOTIFICATION};

/// Channels used when the configuration does not name any
pub const DEFAULT_CHANNELS: [&str; 2] = ["Email", "WhatsApp Business"];

/// Domain events members get told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationEvent {
    /// Account created or validation flags changed
    AccountValidation,
    ReservationCreated,
    PaymentConfirmed,
    Cancellation,
    NoShow,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountValidation => "account_validation",
            Self::ReservationCreated => "reservation_created",
            Self::PaymentConfirmed => "payment_confirmed",
            Self::Cancellation => "cancellation",
            Self::NoShow => "no_show",
        }
    }
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded intent to reach `to` over `channel`. Not a delivery receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub at: DateTime<Utc>,
    pub channel: String,
    pub to: String,
    pub event: NotificationEvent,
    pub payload: serde_json::Value,
}

/// Build one notification per channel, all sharing event, recipient and payload.
pub fn fan_out(
    channels: &[String],
    event: NotificationEvent,
    to: &str,
    payload: &serde_json::Value,
    at: DateTime<Utc>,
) -> Vec<Notification> {
    channels
        .iter()
        .map(|channel| Notification {
            id: new_id(NOTIFICATION),
            at,
            channel: channel.clone(),
            to: to.to_string(),
            event,
            payload: payload.clone(),
        })
        .collect()
}
