//! Shared shapes for services, repositories, and domain entities.
//!
//! These traits carry no behavior of their own. They give business-logic services and
//! data-access layers a common surface so callers can be written against the trait.

use async_trait::async_trait;
use std::error::Error;

/// A long-lived business-logic component with an explicit lifecycle.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::base::Service;
/// use async_trait::async_trait;
///
/// struct Mailer {
///     connected: bool,
/// }
///
/// #[async_trait]
/// impl Service for Mailer {
///     type Error = std::io::Error;
///
///     async fn initialize(&mut self) -> Result<(), Self::Error> {
///         self.connected = true;
///         Ok(())
///     }
///
///     async fn shutdown(&mut self) -> Result<(), Self::Error> {
///         self.connected = false;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync {
    /// Error type for lifecycle failures.
    type Error: Error + Send + Sync + 'static;

    /// Prepare the service for use.
    async fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Release everything the service holds.
    async fn shutdown(&mut self) -> Result<(), Self::Error>;
}

/// Data access for entities of type `T` identified by `Id`.
///
/// A missing entity is not an error: `get` and `update` return `None` and `delete` returns
/// `false`. Errors are reserved for failures of the backing store.
#[async_trait]
pub trait Repository<T, Id>: Send + Sync
where
    T: Send + 'static,
    Id: Send + Sync + 'static,
{
    /// Error type for storage failures.
    type Error: Error + Send + Sync + 'static;

    /// Fetch one entity by id.
    async fn get(&self, id: &Id) -> Result<Option<T>, Self::Error>;

    /// Fetch every entity.
    async fn get_all(&self) -> Result<Vec<T>, Self::Error>;

    /// Store a new entity and return it as stored.
    async fn create(&self, entity: T) -> Result<T, Self::Error>;

    /// Replace the entity stored under `id`.
    ///
    /// Returns `None` when no entity has that id.
    async fn update(&self, id: &Id, entity: T) -> Result<Option<T>, Self::Error>;

    /// Remove the entity stored under `id`, returning whether one was removed.
    async fn delete(&self, id: &Id) -> Result<bool, Self::Error>;

    /// Whether an entity with `id` exists.
    ///
    /// Default implementation delegates to [`get`](Repository::get).
    async fn exists(&self, id: &Id) -> Result<bool, Self::Error> {
        Ok(self.get(id).await?.is_some())
    }
}

/// A domain object with identity.
///
/// Identity is the id alone: two entities with the same id are the same entity whatever their
/// other fields hold. Entities that have not been assigned an id yet all compare as the same.
pub trait Entity {
    /// Identifier type.
    type Id: PartialEq;

    /// The id, or `None` before one is assigned.
    fn id(&self) -> Option<&Self::Id>;

    /// Identity comparison by id.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
