//! Repository contracts.
//!
//! The engine does not implement these; repository code implements them
//! atop a [`crate::ConnectionFactory`], executing its statements against
//! the factory's current connection so the surrounding unit-of-work scope
//! decides when the work commits.

use crate::error::UowResult;
use async_trait::async_trait;

/// Read-side repository over one entity type.
#[async_trait]
pub trait ReadOnlyRepository: Send + Sync {
    /// The entity this repository serves.
    type Entity: Send;
    /// The identifier type of the entity.
    type Id: Send;

    /// Fetches one entity by id.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    async fn get_by_id(&self, id: Self::Id) -> UowResult<Option<Self::Entity>>;

    /// Fetches all entities.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    async fn get_all(&self) -> UowResult<Vec<Self::Entity>>;
}

/// Read-write repository over one entity type.
#[async_trait]
pub trait CrudRepository: ReadOnlyRepository {
    /// Inserts or updates an entity, returning it with any assigned id.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    async fn save_or_update(&self, entity: Self::Entity) -> UowResult<Self::Entity>;

    /// Deletes an entity.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    async fn delete(&self, entity: Self::Entity) -> UowResult<()>;
}
