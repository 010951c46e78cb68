//! `warung-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the menu, stock and
//! order modules (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::AggregateId;
pub use value_object::ValueObject;
