//! Notification aggregate

pub mod model;

pub use model::{fan_out, Notification, NotificationEvent, DEFAULT_CHANNELS};
