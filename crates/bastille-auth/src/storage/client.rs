//! Client storage trait.
//!
//! Defines the interface for OAuth client persistence operations.
//! Implementations are provided by storage backends.

use async_trait::async_trait;

use crate::StorageResult;
use crate::types::Client;

/// Storage operations for OAuth 2.0 client registrations.
///
/// Plain key-value persistence with no caching and no side effects beyond
/// the single client collection.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Insert a new client registration keyed by `client.id`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a client with the same id already exists,
    /// or `Backend` if the storage operation fails.
    async fn register(&self, client: &Client) -> StorageResult<()>;

    /// Fetch a client by its id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no client with that id exists, or `Backend` if
    /// the storage operation fails.
    async fn find_by_id(&self, id: &str) -> StorageResult<Client>;

    /// Delete a client registration by its id.
    ///
    /// Revocation is idempotent: deleting an id that does not exist succeeds
    /// silently.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the storage operation fails.
    async fn revoke(&self, id: &str) -> StorageResult<()>;
}
