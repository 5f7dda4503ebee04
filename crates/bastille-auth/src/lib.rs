//! # bastille-auth
//!
//! Storage contracts for OAuth2 credential artifacts: clients, authorization
//! codes, access tokens and refresh tokens.
//!
//! This crate defines:
//! - Domain types ([`Client`], [`Token`]) and the capability traits the
//!   surrounding OAuth2 protocol logic consumes ([`ClientInfo`],
//!   [`TokenInfo`])
//! - Storage traits ([`ClientStorage`], [`TokenStorage`]) implemented by
//!   backend crates
//! - The expiration policy shared by all backends ([`expiry`])
//! - The storage error taxonomy ([`StorageError`])
//!
//! # Storage model
//!
//! One token issuance (a *grant*) is persisted as up to three physical
//! records: a grant record holding the serialized [`Token`] payload, and up
//! to two index records mapping the bare access/refresh token strings back to
//! it. Each record carries its own expiration timestamp so the underlying
//! store can reclaim it independently. There is no cross-record transaction;
//! readers treat partially visible grants as absent.
//!
//! # Implementations
//!
//! Storage implementations are provided in separate crates:
//!
//! - `bastille-auth-mongodb` - MongoDB storage backend
//! - `bastille-auth-memory` - in-memory storage backend

pub mod error;
pub mod expiry;
pub mod storage;
pub mod types;

pub use error::StorageError;
pub use expiry::GrantExpiry;
pub use storage::{ClientStorage, TokenStorage};
pub use types::{Client, ClientInfo, Token, TokenInfo};

/// Type alias for storage operation results.
pub type StorageResult<T> = Result<T, StorageError>;
