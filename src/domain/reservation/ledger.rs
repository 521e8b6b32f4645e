//! Booking rules
//!
//! [`book`] runs the eligibility and conflict checks in a fixed order (the
//! order decides which error a user sees) and, when all pass, inserts the
//! reservation together with its pending payment.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::model::{NewReservation, Reservation, ReservationStatus};
use crate::domain::payment::Payment;
use crate::domain::state::ClubState;
use crate::domain::user::UserType;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::id::{new_id, PAYMENT, RESERVATION};

/// Bookings may be made from today up to and including today + 7 days.
pub const BOOKING_HORIZON_DAYS: i64 = 7;

/// Outcome of a successful booking
#[derive(Debug, Clone)]
pub struct Booked {
    pub reservation_id: String,
    pub payment_id: String,
    pub user_id: String,
    pub holder_email: String,
    pub price: u64,
}

/// Check that `date` lies in `[today, today + 7]`.
pub fn check_booking_window(date: NaiveDate, today: NaiveDate) -> DomainResult<()> {
    let max = today + Duration::days(BOOKING_HORIZON_DAYS);
    if date < today {
        return Err(DomainError::Validation(
            "Cannot book a date in the past".into(),
        ));
    }
    if date > max {
        return Err(DomainError::Validation(format!(
            "Bookings are only open up to {} days ahead",
            BOOKING_HORIZON_DAYS
        )));
    }
    Ok(())
}

pub fn book(
    state: &mut ClubState,
    actor_id: &str,
    request: &NewReservation,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> DomainResult<Booked> {
    let target_id = request.for_user_id.as_deref().unwrap_or(actor_id);
    let user = state
        .user(target_id)
        .ok_or_else(|| DomainError::not_found("User", "id", target_id))?;

    if state.config.require_email_validation && !user.is_email_validated {
        return Err(DomainError::Unauthorized(
            "Email must be validated before booking".into(),
        ));
    }
    if state.config.require_phone_validation && !user.is_phone_validated {
        return Err(DomainError::Unauthorized(
            "Phone must be validated before booking".into(),
        ));
    }

    check_booking_window(request.date, today)?;

    match state.court(&request.court_id) {
        Some(court) if court.is_active => {}
        _ => {
            return Err(DomainError::Validation(format!(
                "Court {} is not available",
                request.court_id
            )))
        }
    }

    if state.is_blocked(&request.court_id, request.date, &request.time) {
        return Err(DomainError::Conflict("Slot is blocked for maintenance".into()));
    }
    if state.court_taken(&request.court_id, request.date, &request.time) {
        return Err(DomainError::Conflict("Court is already taken for that slot".into()));
    }
    if state.user_booked(&user.id, request.date, &request.time) {
        return Err(DomainError::Conflict(
            "User already has a reservation at that time".into(),
        ));
    }

    let price = match user.user_type {
        UserType::Socio => state.config.price_socio,
        UserType::NoSocio => state.config.price_no_socio,
    };
    let user_id = user.id.clone();
    let holder_email = user.email.clone();

    let reservation = Reservation {
        id: new_id(RESERVATION),
        user_id: user_id.clone(),
        created_by: actor_id.to_string(),
        date: request.date,
        time: request.time.clone(),
        court_id: request.court_id.clone(),
        status: ReservationStatus::PendingPayment,
        price,
        created_at: now,
        updated_at: now,
        cancel_reason: None,
    };
    let payment = Payment::pending(new_id(PAYMENT), reservation.id.clone(), price, now);

    let booked = Booked {
        reservation_id: reservation.id.clone(),
        payment_id: payment.id.clone(),
        user_id,
        holder_email,
        price,
    };
    state.reservations.insert(reservation.id.clone(), reservation);
    state.payments.insert(payment.id.clone(), payment);

    Ok(booked)
}
