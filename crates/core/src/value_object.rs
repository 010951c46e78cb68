//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Order
/// lines are the main example here: once captured at order time they are never
/// edited, only copied.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
