//! Domain events and the mechanics to distribute them.
//!
//! Domain crates define their own event enums and implement [`Event`]; the
//! infrastructure layer wraps them in [`EventEnvelope`]s, publishes them on an
//! [`EventBus`] and feeds them to [`Projection`]s.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod projection;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use projection::Projection;
