//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. In the
/// ledger, `Money` and the canonical pair key are value objects: two amounts of
/// 30 minor units are the same amount, and `{A, B}` is the same pair as
/// `{B, A}`.
///
/// The bounds make value objects cheap to copy into snapshots and safe to share
/// across threads.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug + Send + Sync {}
