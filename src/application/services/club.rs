//! Club booking service: the single entry point for every command
//!
//! Each command runs as one unit: validate, mutate a private copy of the
//! store, append one audit entry plus its notifications, persist the copy,
//! then swap it in. Commits are serialized by a writer lock and re-run
//! their checks against the latest state, so concurrent callers cannot
//! break the slot uniqueness rules.

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::tx::Tx;
use crate::application::ports::{PaymentGateway, SocioVerifier};
use crate::config::{AppConfig, SeedConfig};
use crate::domain::notification::DEFAULT_CHANNELS;
use crate::domain::payment::ledger::{self as payments, ensure_payable, GatewayOutcome};
use crate::domain::reservation::book;
use crate::domain::{
    AuditAction, Block, ClubPolicy, ClubState, DomainError, NewBlock, NewReservation,
    NotificationEvent, PolicyPatch, RegisterUserDto, User, UserRole, UserType,
};
use crate::infrastructure::collaborators::{DniParitySocioVerifier, SimulatedGateway};
use crate::infrastructure::crypto::password::{hash_password, verify_password, DEFAULT_COST};
use crate::infrastructure::storage::SnapshotStore;
use crate::notifications::{CourtStatusChangedEvent, Event, EventBus, SharedEventBus};
use crate::support::errors::{AppResult, InfraError};
use crate::support::id::{new_id, BLOCK, USER};
use crate::support::time::{Clock, SystemClock};

/// Runtime knobs of the service
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Notification channels; each notification is recorded once per channel
    pub channels: Vec<String>,
    pub bcrypt_cost: u32,
    /// Applied only when the snapshot store is empty
    pub seed: SeedConfig,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            bcrypt_cost: DEFAULT_COST,
            seed: SeedConfig::default(),
        }
    }
}

impl From<&AppConfig> for ServiceSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            channels: cfg.notifications.channels.clone(),
            bcrypt_cost: cfg.security.bcrypt_cost,
            seed: cfg.seed.clone(),
        }
    }
}

/// Flags a member confirms about their own account
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountValidation {
    pub email_ok: Option<bool>,
    pub phone_ok: Option<bool>,
}

/// Staff booking on behalf of a member
#[derive(Debug, Clone)]
pub struct ManualReservation {
    pub user_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub court_id: String,
    /// Also record the payment as collected in cash
    pub mark_paid_cash: bool,
}

pub struct ClubServiceBuilder {
    store: Arc<dyn SnapshotStore>,
    socio: Option<Arc<dyn SocioVerifier>>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    clock: Option<Arc<dyn Clock>>,
    event_bus: Option<SharedEventBus>,
    settings: ServiceSettings,
}

impl ClubServiceBuilder {
    pub fn socio_verifier(mut self, socio: Arc<dyn SocioVerifier>) -> Self {
        self.socio = Some(socio);
        self
    }

    pub fn payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_bus(mut self, bus: SharedEventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load the snapshot, seeding and persisting a fresh one if none exists.
    pub async fn open(self) -> AppResult<ClubService> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let state = match self.store.load().await? {
            Some(state) => {
                info!(
                    users = state.users.len(),
                    reservations = state.reservations.len(),
                    "Snapshot loaded"
                );
                state
            }
            None => {
                let now = clock.now();
                let admin = seed_admin(&self.settings.seed, self.settings.bcrypt_cost, now)?;
                let state = ClubState::seed(admin, self.settings.seed.policy.clone(), now);
                self.store.save(&state).await?;
                info!(admin = %self.settings.seed.admin_email, "Fresh installation seeded");
                state
            }
        };

        Ok(ClubService {
            state: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
            store: self.store,
            socio: self
                .socio
                .unwrap_or_else(|| Arc::new(DniParitySocioVerifier::instant())),
            gateway: self
                .gateway
                .unwrap_or_else(|| Arc::new(SimulatedGateway::instant())),
            clock,
            event_bus: self.event_bus.unwrap_or_else(|| Arc::new(EventBus::new())),
            settings: self.settings,
        })
    }
}

fn seed_admin(seed: &SeedConfig, cost: u32, now: DateTime<Utc>) -> AppResult<User> {
    let password_hash = hash_password(&seed.admin_password, cost).map_err(InfraError::from)?;
    Ok(User {
        id: new_id(USER),
        role: UserRole::Admin,
        email: seed.admin_email.trim().to_lowercase(),
        phone: seed.admin_phone.clone(),
        dni: seed.admin_dni.clone(),
        user_type: UserType::Socio,
        password_hash,
        is_email_validated: true,
        is_phone_validated: true,
        created_at: now,
    })
}

async fn instrumented<T, Fut>(command: &'static str, fut: Fut) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
{
    let result = fut.await;
    match &result {
        Ok(_) => {
            metrics::counter!("court_booking_commands_total", "command" => command).increment(1);
        }
        Err(e) => {
            metrics::counter!(
                "court_booking_command_errors_total",
                "command" => command,
                "kind" => e.kind()
            )
            .increment(1);
            info!(command, kind = e.kind(), error = %e, "Command rejected");
        }
    }
    result
}

pub struct ClubService {
    state: ArcSwap<ClubState>,
    writer: Mutex<()>,
    store: Arc<dyn SnapshotStore>,
    socio: Arc<dyn SocioVerifier>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    event_bus: SharedEventBus,
    settings: ServiceSettings,
}

impl ClubService {
    pub fn builder(store: Arc<dyn SnapshotStore>) -> ClubServiceBuilder {
        ClubServiceBuilder {
            store,
            socio: None,
            gateway: None,
            clock: None,
            event_bus: None,
            settings: ServiceSettings::default(),
        }
    }

    /// Current committed state
    pub fn snapshot(&self) -> Arc<ClubState> {
        self.state.load_full()
    }

    pub fn event_bus(&self) -> SharedEventBus {
        self.event_bus.clone()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Run `mutate` on a copy of the latest state and, if it audited
    /// anything, persist the copy and make it current. Errors discard the
    /// copy.
    async fn commit<T, F>(&self, mutate: F) -> AppResult<T>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, DomainError>,
    {
        let guard = self.writer.lock().await;

        let mut next = ClubState::clone(&self.state.load());
        let now = self.clock.now();
        let today = self.clock.today();

        let (value, events) = {
            let mut tx = Tx::new(&mut next, now, today, &self.settings.channels);
            let value = mutate(&mut tx)?;
            if !tx.audited() {
                return Ok(value);
            }
            (value, tx.into_events())
        };

        self.store.save(&next).await?;
        self.state.store(Arc::new(next));
        drop(guard);

        for event in events {
            self.event_bus.publish(event);
        }
        Ok(value)
    }

    // ── ConfigStore ─────────────────────────────────────────────

    pub fn get_config(&self) -> ClubPolicy {
        self.snapshot().config.clone()
    }

    pub async fn set_config(&self, actor_id: &str, patch: PolicyPatch) -> AppResult<()> {
        instrumented("set_config", async {
            self.commit(|tx| {
                patch.apply_to(&mut tx.state.config);
                tx.audit(actor_id, AuditAction::Config, patch.describe());
                Ok(())
            })
            .await?;
            info!(actor_id, patch = %patch.describe(), "Policy updated");
            Ok(())
        })
        .await
    }

    // ── CourtRegistry ───────────────────────────────────────────

    /// Unknown courts are ignored.
    pub async fn set_court_active(
        &self,
        actor_id: &str,
        court_id: &str,
        is_active: bool,
    ) -> AppResult<()> {
        instrumented("set_court_active", async {
            let applied = self
                .commit(|tx| {
                    let Some(court) = tx.state.courts.get_mut(court_id) else {
                        return Ok(false);
                    };
                    court.is_active = is_active;
                    let now = tx.now;
                    tx.audit(
                        actor_id,
                        AuditAction::Court,
                        format!("{} active={}", court_id, is_active),
                    );
                    tx.emit(Event::CourtStatusChanged(CourtStatusChangedEvent {
                        court_id: court_id.to_string(),
                        is_active,
                        timestamp: now,
                    }));
                    Ok(true)
                })
                .await?;
            if applied {
                info!(court_id, is_active, "Court status changed");
            } else {
                warn!(court_id, "Unknown court, nothing changed");
            }
            Ok(())
        })
        .await
    }

    // ── UserDirectory ───────────────────────────────────────────

    /// Self-service sign-up. Returns the new user id.
    pub async fn register(&self, dto: RegisterUserDto) -> AppResult<String> {
        instrumented("register", async {
            let dto = dto.normalized();
            dto.ensure_valid()?;

            if self.snapshot().email_or_dni_taken(&dto.email, &dto.dni) {
                return Err(duplicate_user().into());
            }

            debug!("Looking up socio status");
            let status = self.socio.verify(&dto.dni).await?;
            let user_type = UserType::from_socio_active(status.socio_active);
            let password_hash = hash_password(&dto.password, self.settings.bcrypt_cost)
                .map_err(InfraError::from)?;
            let user_id = new_id(USER);

            self.commit(|tx| {
                // Someone may have registered the same email or DNI while the lookup was in flight
                if tx.state.email_or_dni_taken(&dto.email, &dto.dni) {
                    return Err(duplicate_user());
                }
                let user = User {
                    id: user_id.clone(),
                    role: UserRole::User,
                    email: dto.email.clone(),
                    phone: dto.phone.clone(),
                    dni: dto.dni.clone(),
                    user_type,
                    password_hash,
                    is_email_validated: false,
                    is_phone_validated: false,
                    created_at: tx.now,
                };
                tx.state.users.insert(user.id.clone(), user);
                tx.audit(&user_id, AuditAction::Register, format!("New user ({})", user_type));
                tx.notify(
                    NotificationEvent::AccountValidation,
                    &dto.email,
                    json!({
                        "message": "Your account was created. Validate your email and WhatsApp to book."
                    }),
                );
                Ok(())
            })
            .await?;

            info!(user_id = %user_id, user_type = %user_type, "New user registered");
            Ok(user_id)
        })
        .await
    }

    /// Email + password sign-in. Returns the user id.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        instrumented("login", async {
            let email = email.trim().to_lowercase();
            let user = self
                .snapshot()
                .user_by_email(&email)
                .cloned()
                .ok_or_else(|| DomainError::not_found("User", "email", &email))?;

            let valid = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                false
            });
            if !valid {
                return Err(DomainError::Unauthorized("Invalid credentials".into()).into());
            }

            self.commit(|tx| {
                tx.state.sessions.current_user_id = Some(user.id.clone());
                tx.audit(&user.id, AuditAction::Login, "Email+Password");
                Ok(())
            })
            .await?;

            info!(user_id = %user.id, "User logged in");
            Ok(user.id)
        })
        .await
    }

    /// Set the acting user's own validation flags. Absent flags are untouched.
    pub async fn validate_account(
        &self,
        actor_id: &str,
        validation: AccountValidation,
    ) -> AppResult<()> {
        instrumented("validate_account", async {
            self.commit(|tx| {
                let user = tx
                    .state
                    .users
                    .get_mut(actor_id)
                    .ok_or_else(|| DomainError::not_found("User", "id", actor_id))?;
                if let Some(ok) = validation.email_ok {
                    user.is_email_validated = ok;
                }
                if let Some(ok) = validation.phone_ok {
                    user.is_phone_validated = ok;
                }
                let email = user.email.clone();

                tx.audit(
                    actor_id,
                    AuditAction::Account,
                    format!(
                        "Validation: email={}, phone={}",
                        flag(validation.email_ok),
                        flag(validation.phone_ok)
                    ),
                );
                tx.notify(
                    NotificationEvent::AccountValidation,
                    &email,
                    json!({
                        "email_ok": validation.email_ok,
                        "phone_ok": validation.phone_ok,
                    }),
                );
                Ok(())
            })
            .await?;
            info!(actor_id, "Account validation updated");
            Ok(())
        })
        .await
    }

    // ── BlockRegistry ───────────────────────────────────────────

    /// Block a slot for maintenance. Returns the block id.
    pub async fn add_block(&self, actor_id: &str, block: NewBlock) -> AppResult<String> {
        instrumented("add_block", async {
            let block_id = new_id(BLOCK);
            let reason = block.effective_reason();
            self.commit(|tx| {
                tx.state.blocks.insert(
                    block_id.clone(),
                    Block {
                        id: block_id.clone(),
                        court_id: block.court_id.clone(),
                        date: block.date,
                        time: block.time.clone(),
                        reason: reason.clone(),
                        created_by: actor_id.to_string(),
                        created_at: tx.now,
                    },
                );
                tx.audit(
                    actor_id,
                    AuditAction::Block,
                    format!("{} {} {} ({})", block.court_id, block.date, block.time, reason),
                );
                Ok(())
            })
            .await?;
            info!(block_id = %block_id, court_id = %block.court_id, date = %block.date, time = %block.time, "Slot blocked");
            Ok(block_id)
        })
        .await
    }

    /// Unknown block ids are ignored.
    pub async fn remove_block(&self, actor_id: &str, block_id: &str) -> AppResult<()> {
        instrumented("remove_block", async {
            let removed = self
                .commit(|tx| {
                    if tx.state.blocks.remove(block_id).is_none() {
                        return Ok(false);
                    }
                    tx.audit(actor_id, AuditAction::Unblock, block_id);
                    Ok(true)
                })
                .await?;
            if removed {
                info!(block_id, "Block removed");
            } else {
                warn!(block_id, "Unknown block, nothing changed");
            }
            Ok(())
        })
        .await
    }

    // ── ReservationLedger ───────────────────────────────────────

    /// Book a slot for the actor, or for `request.for_user_id`. Returns the
    /// reservation id; its payment starts out pending.
    pub async fn create_reservation(
        &self,
        actor_id: &str,
        request: NewReservation,
    ) -> AppResult<String> {
        instrumented("create_reservation", async {
            let booked = self
                .commit(|tx| {
                    let booked = book(tx.state, actor_id, &request, tx.today, tx.now)?;
                    tx.audit(
                        actor_id,
                        AuditAction::Reservation,
                        format!(
                            "Created {} ({} {} {})",
                            booked.reservation_id, request.date, request.time, request.court_id
                        ),
                    );
                    tx.notify(
                        NotificationEvent::ReservationCreated,
                        &booked.holder_email,
                        json!({
                            "reservation_id": booked.reservation_id,
                            "date": request.date,
                            "time": request.time,
                            "court_id": request.court_id,
                            "price": booked.price,
                        }),
                    );
                    tx.reservation_changed(&booked.reservation_id);
                    Ok(booked)
                })
                .await?;

            info!(
                reservation_id = %booked.reservation_id,
                payment_id = %booked.payment_id,
                user_id = %booked.user_id,
                court_id = %request.court_id,
                date = %request.date,
                time = %request.time,
                price = booked.price,
                "Reservation created"
            );
            Ok(booked.reservation_id)
        })
        .await
    }

    /// Staff booking, optionally paid in cash on the spot. Each step commits
    /// on its own, then one `Admin` audit entry closes the sequence.
    pub async fn admin_create_manual_reservation(
        &self,
        actor_id: &str,
        manual: ManualReservation,
    ) -> AppResult<String> {
        instrumented("admin_create_manual_reservation", async {
            let request = NewReservation::new(manual.date, manual.time.clone(), manual.court_id.clone())
                .for_user(manual.user_id.clone());
            let reservation_id = self.create_reservation(actor_id, request).await?;

            if manual.mark_paid_cash {
                self.register_cash_payment(actor_id, &reservation_id).await?;
            }

            self.commit(|tx| {
                tx.audit(
                    actor_id,
                    AuditAction::Admin,
                    format!("Manual reservation {}", reservation_id),
                );
                Ok(())
            })
            .await?;
            Ok(reservation_id)
        })
        .await
    }

    // ── PaymentLedger ───────────────────────────────────────────

    /// Charge through the gateway and confirm. Unknown reservations are
    /// ignored. A gateway failure leaves the reservation pending.
    ///
    /// If the reservation is cancelled or marked as a no-show while the
    /// charge is in flight, the receipt is stored on the payment and audited,
    /// and the call returns `Conflict`.
    pub async fn pay_with_gateway(&self, actor_id: &str, reservation_id: &str) -> AppResult<()> {
        instrumented("pay_with_gateway", async {
            let amount = {
                let snapshot = self.snapshot();
                match snapshot.payment_for(reservation_id) {
                    Some(p) if snapshot.reservations.contains_key(reservation_id) => {
                        ensure_payable(&snapshot, reservation_id)?;
                        p.amount
                    }
                    _ => {
                        warn!(reservation_id, "Unknown reservation, nothing charged");
                        return Ok(());
                    }
                }
            };

            debug!(reservation_id, amount, "Charging through gateway");
            let receipt = self.gateway.charge(reservation_id, amount).await?;
            let operation_id = receipt.operation_id.clone();

            let outcome = self
                .commit(|tx| {
                    let outcome =
                        payments::approve_with_gateway(tx.state, reservation_id, receipt, tx.now);
                    match &outcome {
                        GatewayOutcome::UnknownReservation => {}
                        GatewayOutcome::Orphaned(_) => {
                            tx.audit(
                                actor_id,
                                AuditAction::Payment,
                                format!(
                                    "Gateway charge {} arrived after reservation closed (res={})",
                                    operation_id, reservation_id
                                ),
                            );
                        }
                        GatewayOutcome::Approved => {
                            tx.audit(
                                actor_id,
                                AuditAction::Payment,
                                format!("Gateway payment approved (res={})", reservation_id),
                            );
                            if let Some(email) = tx.state.holder_email(reservation_id) {
                                tx.notify(
                                    NotificationEvent::PaymentConfirmed,
                                    &email,
                                    json!({ "reservation_id": reservation_id, "method": "gateway" }),
                                );
                            }
                            tx.reservation_changed(reservation_id);
                        }
                    }
                    Ok(outcome)
                })
                .await?;

            match outcome {
                GatewayOutcome::Approved => {
                    info!(reservation_id, operation_id = %operation_id, "Gateway payment approved");
                    Ok(())
                }
                GatewayOutcome::UnknownReservation => {
                    warn!(reservation_id, "Reservation vanished during charge, nothing changed");
                    Ok(())
                }
                GatewayOutcome::Orphaned(closed) => {
                    warn!(
                        reservation_id,
                        operation_id = %operation_id,
                        "Charge approved for a closed reservation, receipt kept for reversal"
                    );
                    Err(closed.into())
                }
            }
        })
        .await
    }

    pub async fn register_cash_payment(&self, actor_id: &str, reservation_id: &str) -> AppResult<()> {
        instrumented("register_cash_payment", async {
            self.commit(|tx| {
                payments::approve_cash(tx.state, actor_id, reservation_id, tx.now)?;
                tx.audit(
                    actor_id,
                    AuditAction::Payment,
                    format!("Cash payment approved (res={})", reservation_id),
                );
                if let Some(email) = tx.state.holder_email(reservation_id) {
                    tx.notify(
                        NotificationEvent::PaymentConfirmed,
                        &email,
                        json!({ "reservation_id": reservation_id, "method": "cash" }),
                    );
                }
                tx.reservation_changed(reservation_id);
                Ok(())
            })
            .await?;
            info!(reservation_id, actor_id, "Cash payment registered");
            Ok(())
        })
        .await
    }

    /// Cancel from any status. No refund is issued.
    pub async fn cancel_reservation(
        &self,
        actor_id: &str,
        reservation_id: &str,
        reason: &str,
    ) -> AppResult<()> {
        instrumented("cancel_reservation", async {
            self.commit(|tx| {
                payments::cancel(tx.state, reservation_id, reason, tx.now)?;
                let shown = if reason.is_empty() { "no reason" } else { reason };
                tx.audit(
                    actor_id,
                    AuditAction::Reservation,
                    format!("Cancelled {} ({})", reservation_id, shown),
                );
                if let Some(email) = tx.state.holder_email(reservation_id) {
                    tx.notify(
                        NotificationEvent::Cancellation,
                        &email,
                        json!({ "reservation_id": reservation_id, "reason": reason }),
                    );
                }
                tx.reservation_changed(reservation_id);
                Ok(())
            })
            .await?;
            info!(reservation_id, actor_id, "Reservation cancelled");
            Ok(())
        })
        .await
    }

    /// Mark a no-show and refund half the payment. Returns the refunded amount.
    pub async fn mark_no_show_and_refund_50(
        &self,
        actor_id: &str,
        reservation_id: &str,
    ) -> AppResult<u64> {
        instrumented("mark_no_show_and_refund_50", async {
            let refunded = self
                .commit(|tx| {
                    let refunded = payments::no_show_refund(tx.state, actor_id, reservation_id, tx.now)?;
                    tx.audit(
                        actor_id,
                        AuditAction::NoShow,
                        format!("No-show, 50% refund of {} (res={})", refunded, reservation_id),
                    );
                    if let Some(email) = tx.state.holder_email(reservation_id) {
                        tx.notify(
                            NotificationEvent::NoShow,
                            &email,
                            json!({
                                "reservation_id": reservation_id,
                                "refund_percent": 50,
                                "refund_amount": refunded,
                            }),
                        );
                    }
                    tx.reservation_changed(reservation_id);
                    Ok(refunded)
                })
                .await?;
            info!(reservation_id, refunded, "No-show recorded");
            Ok(refunded)
        })
        .await
    }
}

fn duplicate_user() -> DomainError {
    DomainError::Conflict("A user with that email or DNI already exists".into())
}

fn flag(v: Option<bool>) -> String {
    v.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string())
}
