//! Read-only views over the committed state

use chrono::NaiveDate;
use serde::Serialize;

use super::club::ClubService;
use crate::domain::{
    AuditEntry, Block, Court, CourtAvailability, Notification, Payment, Reservation,
    ReservationStatus, User,
};

/// One court as seen for a given slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourtSlot {
    pub court_id: String,
    pub name: String,
    pub availability: CourtAvailability,
}

impl ClubService {
    pub fn courts(&self) -> Vec<Court> {
        self.snapshot().courts.values().cloned().collect()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.snapshot().user(user_id).cloned()
    }

    /// The user of the last successful login on this installation
    pub fn current_user(&self) -> Option<User> {
        let state = self.snapshot();
        let id = state.sessions.current_user_id.as_deref()?;
        state.user(id).cloned()
    }

    /// Status of every court for one slot. Inactive wins over a block,
    /// a block wins over a booking.
    pub fn availability(&self, date: NaiveDate, time: &str) -> Vec<CourtSlot> {
        let state = self.snapshot();
        state
            .courts
            .values()
            .map(|court| {
                let availability = if !court.is_active {
                    CourtAvailability::Inactive
                } else if state.is_blocked(&court.id, date, time) {
                    CourtAvailability::Maintenance
                } else if state.court_taken(&court.id, date, time) {
                    CourtAvailability::Occupied
                } else {
                    CourtAvailability::Available
                };
                CourtSlot {
                    court_id: court.id.clone(),
                    name: court.name.clone(),
                    availability,
                }
            })
            .collect()
    }

    /// The user's reservations, cancelled ones left out, by date then time.
    pub fn reservations_for_user(&self, user_id: &str) -> Vec<Reservation> {
        let mut list: Vec<Reservation> = self
            .snapshot()
            .reservations
            .values()
            .filter(|r| r.user_id == user_id && r.status != ReservationStatus::Cancelled)
            .cloned()
            .collect();
        list.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        list
    }

    /// Every reservation of one day, whatever its status, by time then court.
    pub fn reservations_for_date(&self, date: NaiveDate) -> Vec<Reservation> {
        let mut list: Vec<Reservation> = self
            .snapshot()
            .reservations
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        list.sort_by(|a, b| (&a.time, &a.court_id).cmp(&(&b.time, &b.court_id)));
        list
    }

    pub fn reservation(&self, reservation_id: &str) -> Option<Reservation> {
        self.snapshot().reservations.get(reservation_id).cloned()
    }

    pub fn payment_for(&self, reservation_id: &str) -> Option<Payment> {
        self.snapshot().payment_for(reservation_id).cloned()
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.snapshot().blocks.values().cloned().collect()
    }

    /// Newest first; `None` returns the whole log.
    pub fn audit_entries(&self, limit: Option<usize>) -> Vec<AuditEntry> {
        let state = self.snapshot();
        let take = limit.unwrap_or(state.audit.len());
        state.audit.iter().take(take).cloned().collect()
    }

    /// Newest first
    pub fn notifications_for(&self, recipient: &str) -> Vec<Notification> {
        self.snapshot()
            .notifications
            .iter()
            .filter(|n| n.to.eq_ignore_ascii_case(recipient))
            .cloned()
            .collect()
    }
}
