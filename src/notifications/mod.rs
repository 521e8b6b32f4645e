//! Notifications module
//!
//! Live fan-out of committed changes to in-process subscribers.
//!
//! # Usage
//! ```ignore
//! use court_booking::notifications::create_event_bus;
//!
//! let event_bus = create_event_bus();
//! let mut subscriber = event_bus.subscribe();
//! // hand `event_bus` to `ClubService`, then:
//! while let Some(msg) = subscriber.recv().await {
//!     println!("{} {}", msg.event.event_type(), msg.event.subject_id());
//! }
//! ```

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
