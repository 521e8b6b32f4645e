//! # Court Booking
//!
//! Booking engine for a tennis club: courts, maintenance blocks, members,
//! reservations with their payments, an audit trail and outgoing
//! notifications.
//!
//! ## Architecture
//!
//! - **domain**: Entities, the root store and the booking and payment rules
//! - **application**: The `ClubService` facade and its outbound ports
//! - **infrastructure**: Snapshot storage, password hashing, collaborator stand-ins
//! - **notifications**: In-process event bus for committed changes
//! - **support**: Errors, ids and clocks

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::{ClubService, ServiceSettings};
pub use support::errors::{AppError, AppResult, DomainError};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
