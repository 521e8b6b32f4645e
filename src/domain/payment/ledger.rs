//! Payment and refund workflow over the root store

use chrono::{DateTime, Utc};

use super::model::{GatewayReceipt, NO_SHOW_REFUND_PERCENT};
use crate::domain::state::ClubState;
use crate::support::errors::{DomainError, DomainResult};

fn require_pair(state: &ClubState, reservation_id: &str) -> DomainResult<()> {
    if !state.reservations.contains_key(reservation_id) {
        return Err(DomainError::not_found("Reservation", "id", reservation_id));
    }
    if state.payment_for(reservation_id).is_none() {
        return Err(DomainError::not_found("Payment", "reservation_id", reservation_id));
    }
    Ok(())
}

/// Payments close once a reservation is cancelled or marked as a no-show.
pub fn ensure_payable(state: &ClubState, reservation_id: &str) -> DomainResult<()> {
    match state.reservations.get(reservation_id) {
        Some(r) if r.status.is_terminal() => Err(DomainError::Conflict(format!(
            "Reservation {} is {}; it can no longer be paid",
            reservation_id, r.status
        ))),
        _ => Ok(()),
    }
}

/// What happened to a gateway receipt once it reached the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Payment approved, reservation confirmed
    Approved,
    /// No reservation or payment with that id; nothing touched
    UnknownReservation,
    /// The reservation closed while the charge was in flight. The receipt
    /// is kept on the still-pending payment so the charge can be reversed.
    Orphaned(DomainError),
}

/// Apply a gateway approval.
pub fn approve_with_gateway(
    state: &mut ClubState,
    reservation_id: &str,
    receipt: GatewayReceipt,
    now: DateTime<Utc>,
) -> GatewayOutcome {
    if require_pair(state, reservation_id).is_err() {
        return GatewayOutcome::UnknownReservation;
    }
    if let Err(closed) = ensure_payable(state, reservation_id) {
        if let Some(payment) = state.payment_for_mut(reservation_id) {
            payment.record_orphaned_charge(receipt, now);
        }
        return GatewayOutcome::Orphaned(closed);
    }
    if let Some(payment) = state.payment_for_mut(reservation_id) {
        payment.approve_via_gateway(receipt, now);
    }
    if let Some(reservation) = state.reservations.get_mut(reservation_id) {
        reservation.confirm(now);
    }
    GatewayOutcome::Approved
}

pub fn approve_cash(
    state: &mut ClubState,
    actor_id: &str,
    reservation_id: &str,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    require_pair(state, reservation_id)?;
    ensure_payable(state, reservation_id)?;
    if let Some(payment) = state.payment_for_mut(reservation_id) {
        payment.approve_cash(actor_id, now);
    }
    if let Some(reservation) = state.reservations.get_mut(reservation_id) {
        reservation.confirm(now);
    }
    Ok(())
}

/// Cancel regardless of current status. The payment is left as is.
pub fn cancel(
    state: &mut ClubState,
    reservation_id: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    let reservation = state
        .reservations
        .get_mut(reservation_id)
        .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))?;
    reservation.cancel(reason, now);
    Ok(())
}

/// Mark a no-show and refund half the payment. Returns the refunded amount.
pub fn no_show_refund(
    state: &mut ClubState,
    actor_id: &str,
    reservation_id: &str,
    now: DateTime<Utc>,
) -> DomainResult<u64> {
    require_pair(state, reservation_id)?;
    let refunded = state
        .payment_for_mut(reservation_id)
        .map(|p| p.refund_partial(NO_SHOW_REFUND_PERCENT, actor_id, now))
        .unwrap_or(0);
    if let Some(reservation) = state.reservations.get_mut(reservation_id) {
        reservation.mark_no_show(now);
    }
    Ok(refunded)
}
