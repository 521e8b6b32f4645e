pub mod audit;
pub mod block;
pub mod court;
pub mod notification;
pub mod payment;
pub mod policy;
pub mod reservation;
pub mod state;
pub mod user;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry};
pub use block::{Block, NewBlock};
pub use court::{Court, CourtAvailability};
pub use notification::{Notification, NotificationEvent};
pub use payment::{GatewayReceipt, Payment, PaymentMethod, PaymentStatus};
pub use policy::{AuthMode, ClubPolicy, PolicyPatch};
pub use reservation::{NewReservation, Reservation, ReservationStatus};
pub use state::{ClubState, Sessions};
pub use user::{RegisterUserDto, User, UserRole, UserType};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
