//! Working copy handed to a command while it mutates the store
//!
//! Collects the live events to publish once the copy has been persisted
//! and swapped in.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::notification::fan_out;
use crate::domain::{AuditAction, AuditEntry, ClubState, NotificationEvent};
use crate::notifications::{
    AuditRecordedEvent, Event, NotificationDispatchedEvent, ReservationStatusChangedEvent,
};

pub(crate) struct Tx<'a> {
    pub state: &'a mut ClubState,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    channels: &'a [String],
    events: Vec<Event>,
    audited: bool,
}

impl<'a> Tx<'a> {
    pub fn new(
        state: &'a mut ClubState,
        now: DateTime<Utc>,
        today: NaiveDate,
        channels: &'a [String],
    ) -> Self {
        Self {
            state,
            now,
            today,
            channels,
            events: Vec::new(),
            audited: false,
        }
    }

    /// Every applied change audits exactly once; an unaudited copy is discarded.
    pub fn audited(&self) -> bool {
        self.audited
    }

    /// Append one audit entry.
    pub fn audit(&mut self, by: &str, action: AuditAction, detail: impl Into<String>) {
        let entry = AuditEntry::new(by, action, detail, self.now);
        self.events.push(Event::AuditRecorded(AuditRecordedEvent {
            entry_id: entry.id.clone(),
            by: entry.by.clone(),
            action,
            timestamp: entry.at,
        }));
        self.state.append_audit(entry);
        self.audited = true;
    }

    /// Record one notification per configured channel.
    pub fn notify(&mut self, event: NotificationEvent, to: &str, payload: serde_json::Value) {
        let batch = fan_out(self.channels, event, to, &payload, self.now);
        for n in &batch {
            self.events
                .push(Event::NotificationDispatched(NotificationDispatchedEvent {
                    notification_id: n.id.clone(),
                    channel: n.channel.clone(),
                    to: n.to.clone(),
                    event: n.event,
                    payload: n.payload.clone(),
                    timestamp: n.at,
                }));
        }
        self.state.append_notifications(batch);
    }

    /// Announce the current status of a reservation.
    pub fn reservation_changed(&mut self, reservation_id: &str) {
        if let Some(r) = self.state.reservations.get(reservation_id) {
            self.events
                .push(Event::ReservationStatusChanged(ReservationStatusChangedEvent {
                    reservation_id: r.id.clone(),
                    court_id: r.court_id.clone(),
                    date: r.date,
                    time: r.time.clone(),
                    status: r.status,
                    timestamp: self.now,
                }));
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
