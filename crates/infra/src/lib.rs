//! Infrastructure layer: event store, dispatcher, projections, config and the
//! ledger service that wires them together.

pub mod command_dispatcher;
pub mod config;
pub mod event_store;
pub mod projections;
pub mod read_model;
pub mod services;
