//! Live events
//!
//! Published on the event bus after a command commits, for in-process
//! subscribers such as UI push or outbound mailers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuditAction, NotificationEvent, ReservationStatus};

/// Event types for live subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A notification intent was recorded for a channel
    NotificationDispatched(NotificationDispatchedEvent),
    /// A reservation was created or changed status
    ReservationStatusChanged(ReservationStatusChangedEvent),
    /// A court was activated or deactivated
    CourtStatusChanged(CourtStatusChangedEvent),
    /// An audit entry was appended
    AuditRecorded(AuditRecordedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::NotificationDispatched(_) => "notification_dispatched",
            Event::ReservationStatusChanged(_) => "reservation_status_changed",
            Event::CourtStatusChanged(_) => "court_status_changed",
            Event::AuditRecorded(_) => "audit_recorded",
        }
    }

    /// Id of the entity the event is about
    pub fn subject_id(&self) -> &str {
        match self {
            Event::NotificationDispatched(e) => &e.notification_id,
            Event::ReservationStatusChanged(e) => &e.reservation_id,
            Event::CourtStatusChanged(e) => &e.court_id,
            Event::AuditRecorded(e) => &e.entry_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDispatchedEvent {
    pub notification_id: String,
    pub channel: String,
    pub to: String,
    pub event: NotificationEvent,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusChangedEvent {
    pub reservation_id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: ReservationStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtStatusChangedEvent {
    pub court_id: String,
    pub is_active: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecordedEvent {
    pub entry_id: String,
    pub by: String,
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
