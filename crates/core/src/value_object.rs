//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity and are compared by their attribute values.
/// In this crate that covers [`PolitenessLevel`](crate::PolitenessLevel) and
/// [`WeeklyWindow`](crate::WeeklyWindow): two windows with the same Monday are the
/// same window, regardless of which date was used to derive them.
///
/// Implementors should be immutable; "changing" one means building a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
