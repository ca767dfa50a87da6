//! Value object equality contracts.

use std::hash::{DefaultHasher, Hash, Hasher};

/// An immutable object without identity, equal to another whenever all of
/// its signature fields are equal.
///
/// Implementors return their comparison fields from
/// [`signature`](Self::signature) and get equality and hashing helpers for
/// free; the usual pattern is to delegate `PartialEq`/`Hash` impls to
/// them.
///
/// # Example
///
/// ```rust
/// use uow_core::domain::ValueObject;
///
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     type Signature<'a> = (i64, &'a str);
///     fn signature(&self) -> (i64, &str) {
///         (self.amount, &self.currency)
///     }
/// }
///
/// let a = Money { amount: 100, currency: "EUR".into() };
/// let b = Money { amount: 100, currency: "EUR".into() };
/// assert!(a.value_equals(&b));
/// assert_eq!(a.signature_hash(), b.signature_hash());
/// ```
pub trait ValueObject {
    /// The comparison signature. Usually a tuple of field references.
    type Signature<'a>: PartialEq + Hash
    where
        Self: 'a;

    /// Returns the signature fields of this value object.
    fn signature(&self) -> Self::Signature<'_>;

    /// Whether all signature fields of the two objects are equal.
    fn value_equals(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }

    /// A hash over the signature fields, consistent with
    /// [`value_equals`](Self::value_equals).
    fn signature_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.signature().hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    impl ValueObject for Point {
        type Signature<'a> = (i32, i32);

        fn signature(&self) -> (i32, i32) {
            (self.x, self.y)
        }
    }

    #[test]
    fn equal_signatures_are_equal() {
        let a = Point { x: 1, y: 2 };
        let b = Point { x: 1, y: 2 };
        assert!(a.value_equals(&b));
    }

    #[test]
    fn different_signatures_differ() {
        let a = Point { x: 1, y: 2 };
        let b = Point { x: 2, y: 1 };
        assert!(!a.value_equals(&b));
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        let a = Point { x: 3, y: 4 };
        let b = Point { x: 3, y: 4 };
        assert_eq!(a.signature_hash(), b.signature_hash());
    }

    #[test]
    fn hash_distinguishes_values() {
        let a = Point { x: 3, y: 4 };
        let b = Point { x: 4, y: 3 };
        assert_ne!(a.signature_hash(), b.signature_hash());
    }
}
