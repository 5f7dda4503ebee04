//! Token grant storage trait.
//!
//! Defines the interface for persisting token grants and resolving bare
//! token strings back to them.

use async_trait::async_trait;

use crate::StorageResult;
use crate::types::Token;

/// Storage operations for token grants.
///
/// A grant is never mutated: its lifecycle is create, then either explicit
/// deletion by token value or implicit reclamation when its expiration
/// passes.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Persist a token issuance.
    ///
    /// Physical layout depends on the grant:
    ///
    /// - Code-only grants ([`Token::is_code_grant`]) are written as a single
    ///   grant record keyed by the code string, expiring with the code.
    /// - Access-token grants are written as a grant record under a freshly
    ///   generated id, plus one index record per issued token string (access,
    ///   and refresh if present), each mapping the bare token back to the
    ///   grant record. Expirations follow
    ///   [`GrantExpiry::for_token`](crate::GrantExpiry::for_token).
    ///
    /// The up-to-three writes are independent. A failure on a later write
    /// does not roll back earlier writes; a reader racing an in-flight
    /// issuance may observe an index record with no grant record (or vice
    /// versa) and gets `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` on a primary-key collision, `Corrupt` if the
    /// grant payload cannot be serialized, or `Backend` if a storage
    /// operation fails.
    async fn issue(&self, token: &Token) -> StorageResult<()>;

    /// Delete the grant record keyed by an authorization code.
    ///
    /// Idempotent: succeeds when no matching record exists.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the storage operation fails.
    async fn revoke_by_code(&self, code: &str) -> StorageResult<()>;

    /// Delete the access-token index record only.
    ///
    /// The grant record and a sibling refresh index are left untouched;
    /// revoking one token of a pair does not revoke the other. Idempotent on
    /// missing records.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the storage operation fails.
    async fn revoke_by_access(&self, access: &str) -> StorageResult<()>;

    /// Delete the refresh-token index record only.
    ///
    /// Same semantics as [`revoke_by_access`](Self::revoke_by_access).
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the storage operation fails.
    async fn revoke_by_refresh(&self, refresh: &str) -> StorageResult<()>;

    /// Resolve an authorization code to its grant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no grant record is keyed by the code, `Corrupt`
    /// if the stored payload cannot be deserialized, or `Backend` if the
    /// storage operation fails.
    async fn resolve_by_code(&self, code: &str) -> StorageResult<Token>;

    /// Resolve an access token to its grant.
    ///
    /// Two-step resolution: the index record yields the grant-record id,
    /// then the grant record is fetched and deserialized. `NotFound` is
    /// returned when either hop finds nothing; the caller cannot
    /// distinguish "never existed" from "already reclaimed".
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Corrupt` or `Backend` as for
    /// [`resolve_by_code`](Self::resolve_by_code).
    async fn resolve_by_access(&self, access: &str) -> StorageResult<Token>;

    /// Resolve a refresh token to its grant.
    ///
    /// Same two-step semantics as
    /// [`resolve_by_access`](Self::resolve_by_access).
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Corrupt` or `Backend` as for
    /// [`resolve_by_code`](Self::resolve_by_code).
    async fn resolve_by_refresh(&self, refresh: &str) -> StorageResult<Token>;
}
