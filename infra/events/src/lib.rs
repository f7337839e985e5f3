//! # Event Bus
//!
//! A typed broadcast bus connecting the translation subsystem with whoever
//! reacts to catalogue lifecycle events (HTTP caches, websocket notifiers,
//! front-end translation dumps).
//!
//! ## Overview
//!
//! * **Type-Safe**: channels are keyed by the Rust type of the event.
//! * **Synchronous publishing**: [`EventBus::publish`] never awaits, so it can be
//!   called from blocking code such as cache maintenance.
//! * **Fan-out**: every subscriber receives every event published after it
//!   subscribed. Publishing without subscribers is not an error.
//! * **Explicit shutdown**: after [`EventBus::shutdown`] publishing fails with
//!   [`EventBusError::Closed`].
//!
//! # Example
//!
//! ```rust
//! use rosetta_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct CacheCleared { locale: Option<String> }
//!
//! fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<CacheCleared>()?;
//!
//!     bus.publish(CacheCleared { locale: Some("en".into()) })?;
//!
//!     let events = rx.drain();
//!     assert_eq!(events.len(), 1);
//!     assert_eq!(events[0].locale.as_deref(), Some("en"));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
