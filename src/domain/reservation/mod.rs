//! Reservation aggregate (ReservationLedger)
//!
//! Contains the Reservation entity and the booking rules.

pub mod ledger;
pub mod model;

pub use ledger::{book, check_booking_window, Booked, BOOKING_HORIZON_DAYS};
pub use model::{parse_date_iso, NewReservation, Reservation, ReservationStatus};
