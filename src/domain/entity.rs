//! Domain Layer - Core Entity Trait and Errors
//!
//! Every persisted entity has a unique ID and is thread-safe.

use serde::{Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Display + Send + Sync;

    /// Entity kind used in error messages ("column", "card", ...)
    const KIND: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    /// Referenced board/column/card/checklist does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// A position that cannot be placed even after clamping, or stored
    /// positions that already violate density
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Request shape rejected before touching storage
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Raised by the authorization layer in front of the service
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Transaction or connection failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(kind: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Not-found error for entity type `T`
    pub fn missing<T: Entity>(id: T::Id) -> Self {
        Self::not_found(T::KIND, id)
    }

    /// Storage failures may succeed on retry once positions are re-read
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Caller-side mistakes (4xx class) as opposed to server faults
    pub fn is_client_error(&self) -> bool {
        !self.is_retryable()
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
