//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for persistence.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Generic string key-value store holding whole JSON documents.
///
/// Writes are whole-value overwrites; there are no partial updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    /// Store several values at once. Either every pair is written or none is.
    async fn set_many(&self, entries: &[(&str, String)]) -> DomainResult<()>;

    /// Remove `key` if present
    async fn remove(&self, key: &str) -> DomainResult<()>;
}
