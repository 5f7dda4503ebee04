//! In-memory storage backend for Bastille OAuth2 credential data.
//!
//! Implements the `bastille-auth` storage traits over process-local maps,
//! reproducing the MongoDB backend's physical layout: a grant map plus one
//! index map per token kind, each entry carrying its own expiration.
//!
//! Expired entries are treated as absent on read; [`purge_expired`]
//! physically removes them, playing the role of the document store's TTL
//! reclamation. Useful for tests and embedded deployments.
//!
//! [`purge_expired`]: InMemoryTokenStore::purge_expired
//!
//! # Example
//!
//! ```ignore
//! use bastille_auth::TokenStorage;
//! use bastille_auth_memory::InMemoryTokenStore;
//!
//! let store = InMemoryTokenStore::new();
//! store.issue(&grant).await?;
//! let resolved = store.resolve_by_access("AT1").await?;
//! ```

pub mod client;
pub mod token;

pub use client::InMemoryClientStore;
pub use token::InMemoryTokenStore;
