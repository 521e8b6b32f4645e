//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::support::errors::{DomainError, DomainResult};

/// Reservation status
///
/// `PendingPayment → Confirmed → NoShow`, and `PendingPayment | Confirmed → Cancelled`.
/// `Cancelled` and `NoShow` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Created, waiting for the paired payment to be approved
    PendingPayment,
    /// Payment approved
    Confirmed,
    /// Cancelled by the holder or by staff; frees the slot
    Cancelled,
    /// Holder did not show up; half the amount was refunded
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PendingPayment",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "NoShow",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::NoShow)
    }

    /// Every status except `Cancelled` keeps the slot occupied.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Court reservation for one 60-minute slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// Holder of the booking
    pub user_id: String,
    /// Actor who created it (the holder, or staff for manual bookings)
    pub created_by: String,
    pub date: NaiveDate,
    pub time: String,
    pub court_id: String,
    pub status: ReservationStatus,
    /// Captured at creation; later policy changes never touch it
    pub price: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl Reservation {
    /// Whether this reservation occupies the given court slot
    pub fn occupies_court(&self, court_id: &str, date: NaiveDate, time: &str) -> bool {
        self.status.holds_slot() && self.court_id == court_id && self.date == date && self.time == time
    }

    /// Whether this reservation books the given user at (date, time) on any court
    pub fn books_user(&self, user_id: &str, date: NaiveDate, time: &str) -> bool {
        self.status.holds_slot() && self.user_id == user_id && self.date == date && self.time == time
    }

    pub fn confirm(&mut self, now: DateTime<Utc>) {
        self.status = ReservationStatus::Confirmed;
        self.updated_at = now;
    }

    pub fn cancel(&mut self, reason: &str, now: DateTime<Utc>) {
        self.status = ReservationStatus::Cancelled;
        self.cancel_reason = Some(reason.to_string());
        self.updated_at = now;
    }

    pub fn mark_no_show(&mut self, now: DateTime<Utc>) {
        self.status = ReservationStatus::NoShow;
        self.updated_at = now;
    }
}

/// Booking request
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub date: NaiveDate,
    pub time: String,
    pub court_id: String,
    /// Book on behalf of another user (staff); defaults to the actor
    pub for_user_id: Option<String>,
}

impl NewReservation {
    pub fn new(date: NaiveDate, time: impl Into<String>, court_id: impl Into<String>) -> Self {
        Self {
            date,
            time: time.into(),
            court_id: court_id.into(),
            for_user_id: None,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.for_user_id = Some(user_id.into());
        self
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date_iso(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::Validation(format!("Invalid date: {}", s)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        let now = Utc::now();
        Reservation {
            id: "res_1".into(),
            user_id: "usr_1".into(),
            created_by: "usr_1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            time: "09:00".into(),
            court_id: "c1".into(),
            status: ReservationStatus::PendingPayment,
            price: 8000,
            created_at: now,
            updated_at: now,
            cancel_reason: None,
        }
    }

    #[test]
    fn pending_reservation_holds_slot() {
        let r = sample_reservation();
        let date = r.date;
        assert!(r.occupies_court("c1", date, "09:00"));
        assert!(r.books_user("usr_1", date, "09:00"));
        assert!(!r.occupies_court("c2", date, "09:00"));
        assert!(!r.books_user("usr_2", date, "09:00"));
    }

    #[test]
    fn cancel_releases_slot_and_records_reason() {
        let mut r = sample_reservation();
        let date = r.date;
        r.cancel("rain", Utc::now());
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert_eq!(r.cancel_reason.as_deref(), Some("rain"));
        assert!(!r.occupies_court("c1", date, "09:00"));
        assert!(!r.books_user("usr_1", date, "09:00"));
    }

    #[test]
    fn no_show_still_holds_slot() {
        let mut r = sample_reservation();
        let date = r.date;
        r.confirm(Utc::now());
        r.mark_no_show(Utc::now());
        assert_eq!(r.status, ReservationStatus::NoShow);
        assert!(r.status.is_terminal());
        assert!(r.occupies_court("c1", date, "09:00"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!ReservationStatus::PendingPayment.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::NoShow.is_terminal());
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date_iso("2024-01-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(matches!(parse_date_iso("10/01/2024"), Err(DomainError::Validation(_))));
    }
}
