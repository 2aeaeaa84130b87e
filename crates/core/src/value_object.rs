//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A `Price` of
/// `45.99` is equal to every other `Price` of `45.99`; a `Book` with ISBN
/// `978-0134685991` is an entity and is compared by its ISBN instead.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: value objects are compared by their attribute values
/// - **Debug**: value objects show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
