//! `pillbox-relay` — the MQTT side channel to the embedded dispenser.
//!
//! Two flows, both fire-and-forget:
//!   - after a schedule write, the full snapshot is published to the
//!     outbound topic;
//!   - `{name, day}` requests arriving on the inbound topic are answered
//!     with that user's per-day schedule on the same outbound topic.
//!
//! Delivery is at-most-once. A failed publish is logged and never rolls back
//! the already-committed store write; a bad inbound message is logged and
//! dropped without stopping the receive loop.

pub mod error;
pub mod relay;
pub mod transport;

pub use error::RelayError;
pub use relay::{Relay, SyncRequest};
pub use transport::{connect, MqttPublisher, Publisher};
