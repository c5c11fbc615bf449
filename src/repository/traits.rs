//! Repository Layer - Core Traits
//!
//! Async CRUD contract for entities that carry no ordering invariant.
//! Ordered collections go through the ordering components instead.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for CRUD operations
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity; the returned copy carries the assigned ID
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID; `false` when nothing was there
    async fn delete(&self, id: T::Id) -> DomainResult<bool>;
}
