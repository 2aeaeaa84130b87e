//! Entity trait: identity that outlives attribute values.

/// Entity marker + minimal interface.
///
/// Two entities with the same identifier are the same entity, whatever their
/// other attributes say.
pub trait Entity {
    /// Identifier type (opaque strings are fine, e.g. ISBNs).
    type Id: ?Sized + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
