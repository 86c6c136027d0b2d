//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{AdminRecord, Entity};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Append/list/delete storage for one entity kind.
#[async_trait]
pub trait EntityRepo<E: Entity>: Send + Sync {
    async fn insert(&self, draft: E::Draft) -> Result<E, RepoError>;

    /// All records, oldest first.
    async fn list_all(&self) -> Result<Vec<E>, RepoError>;

    /// Returns `false` when no record matched `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait AdminRepo: Send + Sync {
    async fn first_admin(&self) -> Result<Option<AdminRecord>, RepoError>;

    async fn upsert_admin(&self, email: &str) -> Result<AdminRecord, RepoError>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
