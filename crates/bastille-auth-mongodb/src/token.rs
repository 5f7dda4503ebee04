//! Token grant storage.
//!
//! One token issuance is persisted as up to three physical records:
//!
//! - a grant record in the basic collection, holding the serialized
//!   [`Token`] payload
//! - an index record per issued access/refresh token string, mapping the
//!   bare token back to the grant record
//!
//! Each record carries its own `expires_at` and is reclaimed independently
//! by the TTL index. There is no cross-collection transaction: the writes in
//! [`issue`](MongoTokenStore::issue) are independent, and readers treat a
//! partially visible grant as absent.

use async_trait::async_trait;
use bson::spec::BinarySubtype;
use bson::{Binary, DateTime, doc};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use bastille_auth::storage::TokenStorage;
use bastille_auth::types::Token;
use bastille_auth::{GrantExpiry, StorageError, StorageResult};

use crate::config::TokenStoreConfig;
use crate::{backend_error, index, insert_error};

/// Grant record: the serialized grant payload under its record id.
///
/// The id is the authorization-code string for code-only grants, or a
/// freshly generated UUID otherwise.
#[derive(Debug, Serialize, Deserialize)]
struct GrantDocument {
    #[serde(rename = "_id")]
    id: String,
    payload: Binary,
    expires_at: DateTime,
}

impl GrantDocument {
    fn new(id: String, payload: Vec<u8>, expires_at: OffsetDateTime) -> Self {
        Self {
            id,
            payload: Binary {
                subtype: BinarySubtype::Generic,
                bytes: payload,
            },
            expires_at: DateTime::from_time_0_3(expires_at),
        }
    }
}

/// Index record: maps a bare token string to its grant record.
///
/// `basic_id` references a grant record but nothing enforces the reference;
/// an index entry can outlive its grant (or precede it during an in-flight
/// issuance) and resolution then reports `NotFound`.
#[derive(Debug, Serialize, Deserialize)]
struct TokenIndexDocument {
    #[serde(rename = "_id")]
    id: String,
    basic_id: String,
    expires_at: DateTime,
}

impl TokenIndexDocument {
    fn new(id: String, basic_id: String, expires_at: OffsetDateTime) -> Self {
        Self {
            id,
            basic_id,
            expires_at: DateTime::from_time_0_3(expires_at),
        }
    }
}

/// MongoDB storage for token grants.
#[derive(Debug, Clone)]
pub struct MongoTokenStore {
    basic: Collection<GrantDocument>,
    access: Collection<TokenIndexDocument>,
    refresh: Collection<TokenIndexDocument>,
}

impl MongoTokenStore {
    /// Create a store over an existing database handle.
    ///
    /// Ensures a TTL index on each token collection. Index creation failures
    /// are logged and swallowed; construction always succeeds.
    pub async fn new(db: &Database, config: &TokenStoreConfig) -> Self {
        for collection in [&config.basic, &config.access, &config.refresh] {
            index::ensure_ttl_index(db, collection).await;
        }

        Self {
            basic: db.collection(&config.basic),
            access: db.collection(&config.access),
            refresh: db.collection(&config.refresh),
        }
    }

    /// Create a store by connecting to a MongoDB URI, with default
    /// collection names.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> StorageResult<Self> {
        let db = crate::database(uri, db_name).await?;
        Ok(Self::new(&db, &TokenStoreConfig::default()).await)
    }

    /// Fetch a grant record by id and deserialize its payload.
    async fn fetch_grant(&self, basic_id: &str) -> StorageResult<Token> {
        let doc = self
            .basic
            .find_one(doc! { "_id": basic_id })
            .await
            .map_err(|err| backend_error("find grant record", err))?
            .ok_or_else(|| StorageError::not_found(format!("grant {basic_id}")))?;

        let token = serde_json::from_slice(&doc.payload.bytes)?;
        Ok(token)
    }

    /// Look up the grant-record id behind a bare token string.
    async fn lookup_basic_id(
        &self,
        collection: &Collection<TokenIndexDocument>,
        token: &str,
    ) -> StorageResult<String> {
        let doc = collection
            .find_one(doc! { "_id": token })
            .await
            .map_err(|err| backend_error("find token index", err))?
            .ok_or_else(|| StorageError::not_found(format!("token {token}")))?;
        Ok(doc.basic_id)
    }

    /// Delete an index record, succeeding when none matched.
    async fn delete_index(
        &self,
        collection: &Collection<TokenIndexDocument>,
        token: &str,
    ) -> StorageResult<()> {
        collection
            .delete_one(doc! { "_id": token })
            .await
            .map_err(|err| backend_error("delete token index", err))?;
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for MongoTokenStore {
    async fn issue(&self, token: &Token) -> StorageResult<()> {
        let payload = serde_json::to_vec(token)?;

        if token.is_code_grant() {
            let expires_at = GrantExpiry::for_code(token);
            self.basic
                .insert_one(GrantDocument::new(token.code.clone(), payload, expires_at))
                .await
                .map_err(|err| insert_error(err, &token.code))?;
            return Ok(());
        }

        let expiry = GrantExpiry::for_token(token);
        let basic_id = Uuid::new_v4().to_string();

        // Independent writes: an earlier insert stays in place when a later
        // one fails.
        self.basic
            .insert_one(GrantDocument::new(
                basic_id.clone(),
                payload,
                expiry.grant,
            ))
            .await
            .map_err(|err| insert_error(err, &basic_id))?;

        self.access
            .insert_one(TokenIndexDocument::new(
                token.access.clone(),
                basic_id.clone(),
                expiry.access,
            ))
            .await
            .map_err(|err| insert_error(err, &token.access))?;

        if let Some(refresh_expiry) = expiry.refresh {
            self.refresh
                .insert_one(TokenIndexDocument::new(
                    token.refresh.clone(),
                    basic_id,
                    refresh_expiry,
                ))
                .await
                .map_err(|err| insert_error(err, &token.refresh))?;
        }

        Ok(())
    }

    async fn revoke_by_code(&self, code: &str) -> StorageResult<()> {
        self.basic
            .delete_one(doc! { "_id": code })
            .await
            .map_err(|err| backend_error("delete grant record", err))?;
        Ok(())
    }

    async fn revoke_by_access(&self, access: &str) -> StorageResult<()> {
        self.delete_index(&self.access, access).await
    }

    async fn revoke_by_refresh(&self, refresh: &str) -> StorageResult<()> {
        self.delete_index(&self.refresh, refresh).await
    }

    async fn resolve_by_code(&self, code: &str) -> StorageResult<Token> {
        self.fetch_grant(code).await
    }

    async fn resolve_by_access(&self, access: &str) -> StorageResult<Token> {
        let basic_id = self.lookup_basic_id(&self.access, access).await?;
        self.fetch_grant(&basic_id).await
    }

    async fn resolve_by_refresh(&self, refresh: &str) -> StorageResult<Token> {
        let basic_id = self.lookup_basic_id(&self.refresh, refresh).await?;
        self.fetch_grant(&basic_id).await
    }
}
