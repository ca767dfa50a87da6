//! Entity equality contracts.

/// Exposes the business key of an entity: the set of fields that compare
/// otherwise-unidentified (transient) entities for equality, as opposed to
/// a database-assigned identifier.
pub trait BusinessKey {
    /// The comparison key. Usually a tuple of field references.
    type Key<'a>: PartialEq
    where
        Self: 'a;

    /// Returns the business key of this entity.
    fn business_key(&self) -> Self::Key<'_>;
}

/// An object with identity that runs through a lifecycle: transient before
/// it is persisted, then identified by a database-assigned id.
///
/// # Example
///
/// ```rust
/// use uow_core::domain::{BusinessKey, Entity};
///
/// struct User {
///     id: Option<u64>,
///     email: String,
/// }
///
/// impl BusinessKey for User {
///     type Key<'a> = &'a str;
///     fn business_key(&self) -> &str {
///         &self.email
///     }
/// }
///
/// impl Entity for User {
///     type Id = u64;
///     fn id(&self) -> Option<u64> {
///         self.id
///     }
/// }
///
/// let stored = User { id: Some(1), email: "ana@example.com".into() };
/// let fresh = User { id: None, email: "ana@example.com".into() };
/// assert!(stored.same_entity_as(&fresh));
/// ```
pub trait Entity: BusinessKey {
    /// The identifier type assigned on persistence.
    type Id: PartialEq;

    /// Returns the persistent identifier, or `None` while transient.
    fn id(&self) -> Option<Self::Id>;

    /// Whether this entity has not yet been persisted.
    fn is_transient(&self) -> bool {
        self.id().is_none()
    }

    /// Whether two entities represent the same domain object.
    ///
    /// When both carry a persistent id, the ids decide. Otherwise the
    /// business keys decide, so a transient entity can be matched against
    /// its stored counterpart.
    fn same_entity_as(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => self.business_key() == other.business_key(),
        }
    }
}
