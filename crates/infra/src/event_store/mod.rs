//! Append-only event store boundary.
//!
//! Streams are keyed by aggregate id. The store makes no storage assumptions;
//! the in-memory implementation backs the service and the tests.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventStore;
pub use r#trait::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};
