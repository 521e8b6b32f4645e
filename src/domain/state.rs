//! Root store
//!
//! Every entity lives in one [`ClubState`] value. Entities reference each
//! other by id only, so the whole state clones and serializes as plain data.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::audit::{AuditAction, AuditEntry};
use super::block::Block;
use super::court::{default_courts, Court};
use super::notification::Notification;
use super::payment::Payment;
use super::policy::ClubPolicy;
use super::reservation::Reservation;
use super::user::User;

/// Who is signed in on this installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sessions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubState {
    pub config: ClubPolicy,
    pub courts: BTreeMap<String, Court>,
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub sessions: Sessions,
    pub reservations: BTreeMap<String, Reservation>,
    pub payments: BTreeMap<String, Payment>,
    pub blocks: BTreeMap<String, Block>,
    /// Newest first
    pub audit: VecDeque<AuditEntry>,
    /// Newest first
    pub notifications: VecDeque<Notification>,
}

impl ClubState {
    /// Fresh installation: one admin, the default courts and the given policy.
    pub fn seed(admin: User, policy: ClubPolicy, now: DateTime<Utc>) -> Self {
        let detail = format!("System initialised with admin user {}", admin.email);
        let admin_id = admin.id.clone();

        let mut state = Self {
            config: policy,
            courts: default_courts().into_iter().map(|c| (c.id.clone(), c)).collect(),
            users: BTreeMap::new(),
            sessions: Sessions::default(),
            reservations: BTreeMap::new(),
            payments: BTreeMap::new(),
            blocks: BTreeMap::new(),
            audit: VecDeque::new(),
            notifications: VecDeque::new(),
        };
        state.users.insert(admin_id.clone(), admin);
        state.append_audit(AuditEntry::new(admin_id, AuditAction::Seed, detail, now));
        state
    }

    // ── Lookups ──────────────────────────────────────────────────

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.has_email(email))
    }

    pub fn email_or_dni_taken(&self, email: &str, dni: &str) -> bool {
        self.users.values().any(|u| u.has_email(email) || u.dni == dni)
    }

    pub fn court(&self, id: &str) -> Option<&Court> {
        self.courts.get(id)
    }

    pub fn payment_for(&self, reservation_id: &str) -> Option<&Payment> {
        self.payments
            .values()
            .find(|p| p.reservation_id == reservation_id)
    }

    pub fn payment_for_mut(&mut self, reservation_id: &str) -> Option<&mut Payment> {
        self.payments
            .values_mut()
            .find(|p| p.reservation_id == reservation_id)
    }

    /// Email of the holder of a reservation, if both still resolve
    pub fn holder_email(&self, reservation_id: &str) -> Option<String> {
        let reservation = self.reservations.get(reservation_id)?;
        self.user(&reservation.user_id).map(|u| u.email.clone())
    }

    // ── Slot rules ───────────────────────────────────────────────

    pub fn is_blocked(&self, court_id: &str, date: NaiveDate, time: &str) -> bool {
        self.blocks.values().any(|b| b.covers(court_id, date, time))
    }

    pub fn court_taken(&self, court_id: &str, date: NaiveDate, time: &str) -> bool {
        self.reservations
            .values()
            .any(|r| r.occupies_court(court_id, date, time))
    }

    pub fn user_booked(&self, user_id: &str, date: NaiveDate, time: &str) -> bool {
        self.reservations
            .values()
            .any(|r| r.books_user(user_id, date, time))
    }

    // ── Append-only logs ─────────────────────────────────────────

    pub fn append_audit(&mut self, entry: AuditEntry) {
        self.audit.push_front(entry);
    }

    pub fn append_notifications(&mut self, batch: Vec<Notification>) {
        for n in batch.into_iter().rev() {
            self.notifications.push_front(n);
        }
    }
}
