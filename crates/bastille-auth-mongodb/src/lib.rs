//! MongoDB storage backend for Bastille OAuth2 credential data.
//!
//! Provides persistent storage for:
//!
//! - OAuth client registrations ([`MongoClientStore`])
//! - Token grants: authorization codes, access tokens, refresh tokens
//!   ([`MongoTokenStore`])
//!
//! Token collections carry a TTL index on `expires_at`, so expired records
//! are reclaimed by the server without application-level sweeping.
//!
//! # Example
//!
//! ```ignore
//! use bastille_auth::{ClientStorage, TokenStorage};
//! use bastille_auth_mongodb::{MongoClientStore, MongoTokenStore};
//!
//! let clients = MongoClientStore::connect("mongodb://localhost", "oauth2").await?;
//! let tokens = MongoTokenStore::connect("mongodb://localhost", "oauth2").await?;
//!
//! tokens.issue(&grant).await?;
//! let resolved = tokens.resolve_by_access("AT1").await?;
//! ```

pub mod client;
pub mod config;
mod index;
pub mod token;

pub use client::MongoClientStore;
pub use config::{ClientStoreConfig, TokenStoreConfig};
pub use token::MongoTokenStore;

use bastille_auth::{StorageError, StorageResult};
use mongodb::error::{ErrorKind, WriteFailure};

/// MongoDB server error code for a unique-key violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Connect to a MongoDB deployment and select a database.
pub(crate) async fn database(uri: &str, db_name: &str) -> StorageResult<mongodb::Database> {
    let client = mongodb::Client::with_uri_str(uri)
        .await
        .map_err(|err| StorageError::backend(format!("MongoDB connection failed: {err}")))?;
    Ok(client.database(db_name))
}

/// Returns `true` if the driver error carries the server's native
/// duplicate-key signal.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

/// Map a driver error on insert to the storage taxonomy.
pub(crate) fn insert_error(err: mongodb::error::Error, key: &str) -> StorageError {
    if is_duplicate_key(&err) {
        StorageError::duplicate_key(key)
    } else {
        StorageError::backend(format!("insert failed: {err}"))
    }
}

/// Map any other driver error to a backend fault.
pub(crate) fn backend_error(context: &str, err: mongodb::error::Error) -> StorageError {
    StorageError::backend(format!("{context}: {err}"))
}
