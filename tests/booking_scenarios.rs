//! End-to-end booking flows through `ClubService`

use std::path::Path;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate};

use court_booking::application::{AccountValidation, ClubService, ManualReservation, ServiceSettings};
use court_booking::domain::{
    AuditAction, CourtAvailability, DomainError, NewBlock, NewReservation, PaymentMethod,
    PaymentStatus, PolicyPatch, RegisterUserDto, ReservationStatus, UserType,
};
use court_booking::infrastructure::{
    DniParitySocioVerifier, InMemorySnapshotStore, JsonFileSnapshotStore, SimulatedGateway,
};
use court_booking::support::time::FixedClock;
use court_booking::AppError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn settings() -> ServiceSettings {
    ServiceSettings {
        bcrypt_cost: 4,
        ..ServiceSettings::default()
    }
}

async fn open_with(store: Arc<InMemorySnapshotStore>) -> ClubService {
    ClubService::builder(store)
        .clock(Arc::new(FixedClock::new(today())))
        .settings(settings())
        .open()
        .await
        .unwrap()
}

async fn open() -> (ClubService, Arc<InMemorySnapshotStore>) {
    let store = Arc::new(InMemorySnapshotStore::new());
    (open_with(store.clone()).await, store)
}

fn admin_id(service: &ClubService) -> String {
    service
        .snapshot()
        .user_by_email("admin@club.local")
        .unwrap()
        .id
        .clone()
}

/// Register, log in and validate both channels.
async fn member(service: &ClubService, email: &str, dni: &str) -> String {
    let id = service
        .register(RegisterUserDto::new(email, "11-5555-0000", dni, "Secret-1"))
        .await
        .unwrap();
    service.login(email, "Secret-1").await.unwrap();
    service
        .validate_account(
            &id,
            AccountValidation {
                email_ok: Some(true),
                phone_ok: Some(true),
            },
        )
        .await
        .unwrap();
    id
}

fn domain(err: &AppError) -> &DomainError {
    err.as_domain().expect("domain error")
}

fn conflict_message(err: &AppError) -> String {
    match domain(err) {
        DomainError::Conflict(msg) => msg.clone(),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn socio_books_at_socio_price() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;

    assert_eq!(service.user(&ana).unwrap().user_type, UserType::Socio);
    assert!(!service.user(&ana).unwrap().is_admin());

    let id = service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c1"))
        .await
        .unwrap();

    let reservation = service.reservation(&id).unwrap();
    assert_eq!(reservation.price, 0);
    assert_eq!(reservation.status, ReservationStatus::PendingPayment);
    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.amount, 0);
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.method, None);
}

#[tokio::test]
async fn second_booking_of_a_taken_court_is_rejected() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;
    let beto = member(&service, "beto@example.com", "30111223").await;

    service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c1"))
        .await
        .unwrap();
    let err = service
        .create_reservation(&beto, NewReservation::new(today(), "09:00", "c1"))
        .await
        .unwrap_err();

    assert!(conflict_message(&err).contains("taken"));
    assert!(service.reservations_for_user(&beto).is_empty());
}

#[tokio::test]
async fn blocked_slot_rejects_until_unblocked() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let ana = member(&service, "ana@example.com", "30111222").await;

    let block_id = service
        .add_block(&admin, NewBlock::new("c2", today(), "10:00", "Maintenance"))
        .await
        .unwrap();

    let availability = service.availability(today(), "10:00");
    let c2 = availability.iter().find(|s| s.court_id == "c2").unwrap();
    assert_eq!(c2.availability, CourtAvailability::Maintenance);

    let err = service
        .create_reservation(&ana, NewReservation::new(today(), "10:00", "c2"))
        .await
        .unwrap_err();
    assert!(conflict_message(&err).contains("blocked"));

    service.remove_block(&admin, &block_id).await.unwrap();
    service
        .create_reservation(&ana, NewReservation::new(today(), "10:00", "c2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn gateway_payment_then_no_show_refunds_half() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let beto = member(&service, "beto@example.com", "30111223").await;

    let id = service
        .create_reservation(&beto, NewReservation::new(today(), "11:00", "c3"))
        .await
        .unwrap();
    assert_eq!(service.reservation(&id).unwrap().price, 8000);

    service.pay_with_gateway(&beto, &id).await.unwrap();
    assert_eq!(service.reservation(&id).unwrap().status, ReservationStatus::Confirmed);
    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.status, PaymentStatus::Approved);
    assert_eq!(payment.method, Some(PaymentMethod::Gateway));
    assert!(payment
        .meta
        .gateway
        .as_ref()
        .unwrap()
        .operation_id
        .starts_with("gw_"));

    let refunded = service.mark_no_show_and_refund_50(&admin, &id).await.unwrap();
    assert_eq!(refunded, 4000);
    assert_eq!(service.reservation(&id).unwrap().status, ReservationStatus::NoShow);
    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.status, PaymentStatus::RefundedPartial);
    let refund = payment.meta.refund.unwrap();
    assert_eq!(refund.percent, 50);
    assert_eq!(refund.amount, 4000);
    assert_eq!(refund.by, admin);
}

#[tokio::test]
async fn booking_window_covers_today_through_seven_days() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;

    service
        .create_reservation(&ana, NewReservation::new(today(), "08:00", "c1"))
        .await
        .unwrap();
    service
        .create_reservation(&ana, NewReservation::new(today() + Duration::days(7), "08:00", "c1"))
        .await
        .unwrap();

    for date in [today() - Duration::days(1), today() + Duration::days(8)] {
        let err = service
            .create_reservation(&ana, NewReservation::new(date, "08:00", "c1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }
}

#[tokio::test]
async fn unvalidated_accounts_cannot_book_unless_policy_allows() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let id = service
        .register(RegisterUserDto::new("new@example.com", "11-1", "40111222", "Secret-1"))
        .await
        .unwrap();

    let err = service
        .create_reservation(&id, NewReservation::new(today(), "12:00", "c1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "authorization");

    service
        .set_config(
            &admin,
            PolicyPatch {
                require_email_validation: Some(false),
                require_phone_validation: Some(false),
                ..PolicyPatch::default()
            },
        )
        .await
        .unwrap();
    service
        .create_reservation(&id, NewReservation::new(today(), "12:00", "c1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn price_is_captured_at_booking_time() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let beto = member(&service, "beto@example.com", "30111223").await;

    let first = service
        .create_reservation(&beto, NewReservation::new(today(), "13:00", "c1"))
        .await
        .unwrap();
    service
        .set_config(
            &admin,
            PolicyPatch {
                price_no_socio: Some(9500),
                ..PolicyPatch::default()
            },
        )
        .await
        .unwrap();
    let second = service
        .create_reservation(&beto, NewReservation::new(today(), "14:00", "c1"))
        .await
        .unwrap();

    assert_eq!(service.reservation(&first).unwrap().price, 8000);
    assert_eq!(service.payment_for(&first).unwrap().amount, 8000);
    assert_eq!(service.reservation(&second).unwrap().price, 9500);
    assert_eq!(service.get_config().price_no_socio, 9500);
}

#[tokio::test]
async fn each_successful_command_audits_once_and_failures_not_at_all() {
    let (service, store) = open().await;
    let admin = admin_id(&service);
    assert_eq!(service.audit_entries(None).len(), 1);
    assert_eq!(service.audit_entries(None)[0].action, AuditAction::Seed);

    let ana = member(&service, "ana@example.com", "30111222").await;
    // register, login, validate
    assert_eq!(service.audit_entries(None).len(), 4);

    let saves = store.save_count();
    let err = service.login("ana@example.com", "wrong-Pass1").await.unwrap_err();
    assert_eq!(err.kind(), "authorization");
    let err = service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c9"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(service.audit_entries(None).len(), 4);
    assert_eq!(store.save_count(), saves);

    let id = service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c1"))
        .await
        .unwrap();
    service.register_cash_payment(&admin, &id).await.unwrap();
    service.cancel_reservation(&admin, &id, "rain").await.unwrap();

    let actions: Vec<AuditAction> = service
        .audit_entries(Some(3))
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![AuditAction::Reservation, AuditAction::Payment, AuditAction::Reservation]
    );
    assert_eq!(service.audit_entries(None).len(), 7);
}

#[tokio::test]
async fn notifications_fan_out_to_every_channel() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;
    // register + validate
    assert_eq!(service.notifications_for("ana@example.com").len(), 4);

    service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c1"))
        .await
        .unwrap();
    let latest = service.notifications_for("ANA@example.com");
    assert_eq!(latest.len(), 6);
    let channels: Vec<&str> = latest[..2].iter().map(|n| n.channel.as_str()).collect();
    assert!(channels.contains(&"Email"));
    assert!(channels.contains(&"WhatsApp Business"));
    assert_eq!(latest[0].payload["court_id"], "c1");
}

#[tokio::test]
async fn lenient_commands_on_unknown_ids_change_nothing() {
    let (service, store) = open().await;
    let admin = admin_id(&service);
    let before = service.snapshot();
    let saves = store.save_count();

    service.pay_with_gateway(&admin, "res_missing").await.unwrap();
    service.set_court_active(&admin, "c9", false).await.unwrap();
    service.remove_block(&admin, "blk_missing").await.unwrap();

    assert_eq!(*service.snapshot(), *before);
    assert_eq!(store.save_count(), saves);

    for err in [
        service.register_cash_payment(&admin, "res_missing").await.unwrap_err(),
        service.cancel_reservation(&admin, "res_missing", "").await.unwrap_err(),
        service.mark_no_show_and_refund_50(&admin, "res_missing").await.unwrap_err(),
    ] {
        assert_eq!(err.kind(), "not_found");
    }
}

#[tokio::test]
async fn inactive_court_cannot_be_booked() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let ana = member(&service, "ana@example.com", "30111222").await;

    service.set_court_active(&admin, "c4", false).await.unwrap();
    let err = service
        .create_reservation(&ana, NewReservation::new(today(), "09:00", "c4"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(service
        .availability(today(), "09:00")
        .iter()
        .any(|s| s.court_id == "c4" && s.availability == CourtAvailability::Inactive));
}

#[tokio::test]
async fn one_user_cannot_hold_two_courts_at_once() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;

    service
        .create_reservation(&ana, NewReservation::new(today(), "15:00", "c1"))
        .await
        .unwrap();
    let err = service
        .create_reservation(&ana, NewReservation::new(today(), "15:00", "c2"))
        .await
        .unwrap_err();
    assert!(conflict_message(&err).contains("already has a reservation"));
}

#[tokio::test]
async fn cancelled_reservation_frees_the_slot_and_cannot_be_paid() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let ana = member(&service, "ana@example.com", "30111222").await;
    let beto = member(&service, "beto@example.com", "30111223").await;

    let id = service
        .create_reservation(&ana, NewReservation::new(today(), "16:00", "c1"))
        .await
        .unwrap();
    service.cancel_reservation(&ana, &id, "").await.unwrap();
    assert_eq!(
        service.reservation(&id).unwrap().status,
        ReservationStatus::Cancelled
    );
    assert!(service.reservations_for_user(&ana).is_empty());

    let err = service.pay_with_gateway(&ana, &id).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");
    let err = service.register_cash_payment(&admin, &id).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");

    service
        .create_reservation(&beto, NewReservation::new(today(), "16:00", "c1"))
        .await
        .unwrap();
    assert_eq!(service.reservations_for_date(today()).len(), 2);
}

#[tokio::test]
async fn manual_reservation_paid_in_cash() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let beto = member(&service, "beto@example.com", "30111223").await;

    let id = service
        .admin_create_manual_reservation(
            &admin,
            ManualReservation {
                user_id: beto.clone(),
                date: today(),
                time: "17:00".into(),
                court_id: "c2".into(),
                mark_paid_cash: true,
            },
        )
        .await
        .unwrap();

    let reservation = service.reservation(&id).unwrap();
    assert_eq!(reservation.user_id, beto);
    assert_eq!(reservation.created_by, admin);
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.method, Some(PaymentMethod::Cash));
    assert_eq!(payment.meta.cash.unwrap().by, admin);

    let actions: Vec<AuditAction> = service
        .audit_entries(Some(3))
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![AuditAction::Admin, AuditAction::Payment, AuditAction::Reservation]
    );
}

#[tokio::test]
async fn manual_reservation_failure_leaves_no_admin_entry() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let audit_len = service.audit_entries(None).len();

    let err = service
        .admin_create_manual_reservation(
            &admin,
            ManualReservation {
                user_id: "usr_missing".into(),
                date: today(),
                time: "17:00".into(),
                court_id: "c2".into(),
                mark_paid_cash: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert_eq!(service.audit_entries(None).len(), audit_len);
}

#[tokio::test]
async fn registration_rejects_duplicates_and_bad_input() {
    let (service, _) = open().await;
    member(&service, "ana@example.com", "30111222").await;

    let dup_email = service
        .register(RegisterUserDto::new(" ANA@example.com ", "11", "50111222", "Secret-1"))
        .await
        .unwrap_err();
    assert_eq!(dup_email.kind(), "conflict");

    let dup_dni = service
        .register(RegisterUserDto::new("other@example.com", "11", "30111222", "Secret-1"))
        .await
        .unwrap_err();
    assert_eq!(dup_dni.kind(), "conflict");

    let weak = service
        .register(RegisterUserDto::new("weak@example.com", "11", "60111222", "secret"))
        .await
        .unwrap_err();
    assert_eq!(weak.kind(), "validation");
}

#[tokio::test]
async fn login_records_the_session() {
    let (service, _) = open().await;
    assert!(service.current_user().is_none());

    let err = service.login("nobody@example.com", "Secret-1").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");

    let ana = member(&service, "ana@example.com", "30111222").await;
    assert_eq!(service.current_user().unwrap().id, ana);

    let admin = service.login("admin@club.local", "admin").await.unwrap();
    assert_eq!(service.current_user().unwrap().id, admin);
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_admit_exactly_one() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;
    let beto = member(&service, "beto@example.com", "30111223").await;

    let (a, b) = tokio::join!(
        service.create_reservation(&ana, NewReservation::new(today(), "18:00", "c1")),
        service.create_reservation(&beto, NewReservation::new(today(), "18:00", "c1")),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = a.err().or(b.err()).unwrap();
    assert_eq!(loser.kind(), "conflict");
    assert_eq!(service.reservations_for_date(today()).len(), 1);
}

#[tokio::test]
async fn committed_changes_are_published() {
    let (service, _) = open().await;
    let ana = member(&service, "ana@example.com", "30111222").await;
    let mut subscriber = service.event_bus().subscribe();

    service
        .create_reservation(&ana, NewReservation::new(today(), "19:00", "c1"))
        .await
        .unwrap();

    let mut types = Vec::new();
    while let Some(msg) = subscriber.try_recv() {
        types.push(msg.event.event_type());
    }
    assert!(types.contains(&"audit_recorded"));
    assert!(types.contains(&"notification_dispatched"));
    assert!(types.contains(&"reservation_status_changed"));
}

async fn open_file(path: &Path) -> ClubService {
    ClubService::builder(Arc::new(JsonFileSnapshotStore::new(path)))
        .clock(Arc::new(FixedClock::new(today())))
        .settings(settings())
        .open()
        .await
        .unwrap()
}

#[tokio::test]
async fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let id = {
        let service = open_file(&path).await;
        let ana = member(&service, "ana@example.com", "30111222").await;
        service
            .create_reservation(&ana, NewReservation::new(today(), "20:00", "c1"))
            .await
            .unwrap()
    };

    let reopened = open_file(&path).await;
    assert_eq!(
        reopened.reservation(&id).unwrap().status,
        ReservationStatus::PendingPayment
    );
    assert_eq!(reopened.current_user().unwrap().email, "ana@example.com");
    // seeded once only
    let seeds = reopened
        .audit_entries(None)
        .iter()
        .filter(|e| e.action == AuditAction::Seed)
        .count();
    assert_eq!(seeds, 1);
}

#[tokio::test]
async fn reopening_an_in_memory_store_keeps_state() {
    let store = Arc::new(InMemorySnapshotStore::new());
    let first = open_with(store.clone()).await;
    member(&first, "ana@example.com", "30111222").await;

    let second = open_with(store).await;
    assert!(second.snapshot().user_by_email("ana@example.com").is_some());
}

#[tokio::test]
async fn no_show_before_payment_refunds_half_of_the_price() {
    let (service, _) = open().await;
    let admin = admin_id(&service);
    let beto = member(&service, "beto@example.com", "30111223").await;

    let id = service
        .create_reservation(&beto, NewReservation::new(today(), "15:00", "c2"))
        .await
        .unwrap();
    assert_eq!(service.payment_for(&id).unwrap().status, PaymentStatus::Pending);

    let refunded = service.mark_no_show_and_refund_50(&admin, &id).await.unwrap();
    assert_eq!(refunded, 4000);
    assert_eq!(service.reservation(&id).unwrap().status, ReservationStatus::NoShow);
    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.status, PaymentStatus::RefundedPartial);
    assert_eq!(payment.method, None);
    assert_eq!(payment.meta.refund.unwrap().amount, 4000);
}

#[tokio::test(start_paused = true)]
async fn concurrent_sign_ups_with_one_dni_admit_exactly_one() {
    let service = ClubService::builder(Arc::new(InMemorySnapshotStore::new()))
        .clock(Arc::new(FixedClock::new(today())))
        .socio_verifier(Arc::new(DniParitySocioVerifier::new(StdDuration::from_millis(100))))
        .settings(settings())
        .open()
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        service.register(RegisterUserDto::new("ana@example.com", "11", "30111222", "Secret-1")),
        service.register(RegisterUserDto::new("eva@example.com", "11", "30111222", "Secret-1")),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = a.err().or(b.err()).unwrap();
    assert_eq!(loser.kind(), "conflict");
    let with_dni = service
        .snapshot()
        .users
        .values()
        .filter(|u| u.dni == "30111222")
        .count();
    assert_eq!(with_dni, 1);
}

#[tokio::test(start_paused = true)]
async fn charge_landing_after_cancellation_keeps_the_receipt() {
    let service = ClubService::builder(Arc::new(InMemorySnapshotStore::new()))
        .clock(Arc::new(FixedClock::new(today())))
        .payment_gateway(Arc::new(SimulatedGateway::new(StdDuration::from_millis(200))))
        .settings(settings())
        .open()
        .await
        .unwrap();
    let admin = admin_id(&service);
    let beto = member(&service, "beto@example.com", "30111223").await;
    let id = service
        .create_reservation(&beto, NewReservation::new(today(), "16:00", "c1"))
        .await
        .unwrap();

    let (paid, cancelled) = tokio::join!(service.pay_with_gateway(&beto, &id), async {
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        service.cancel_reservation(&admin, &id, "rain").await
    });

    cancelled.unwrap();
    assert_eq!(paid.unwrap_err().kind(), "conflict");
    assert_eq!(service.reservation(&id).unwrap().status, ReservationStatus::Cancelled);

    let payment = service.payment_for(&id).unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.method, None);
    let operation_id = payment.meta.gateway.unwrap().operation_id;
    assert!(operation_id.starts_with("gw_"));

    let newest = &service.audit_entries(Some(1))[0];
    assert_eq!(newest.action, AuditAction::Payment);
    assert!(newest.detail.contains(&operation_id));
}

#[tokio::test]
async fn unreadable_password_hash_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let ana = {
        let service = open_file(&path).await;
        member(&service, "ana@example.com", "30111222").await
    };

    let mut snapshot: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    snapshot["users"][ana.as_str()]["password_hash"] = "not-a-bcrypt-hash".into();
    std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

    let reopened = open_file(&path).await;
    let err = reopened.login("ana@example.com", "Secret-1").await.unwrap_err();
    assert_eq!(err.kind(), "authorization");
}
