//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: they are defined entirely by what they
//! hold. Cash amounts are the canonical example in a vending machine.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ## Value Object vs Kind-keyed records
///
/// - **Value Object**: two instances with the same fields are equal (`Money(1000) == Money(1000)`).
/// - **Kind-keyed record**: equality is defined on a discriminator only. A
///   `Beverage` is equal to another beverage of the same kind even when the
///   manufacture dates differ, so it does *not* implement this trait.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Money(u64);
///
/// impl ValueObject for Money {}
///
/// assert_eq!(Money(1000), Money(1000));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
