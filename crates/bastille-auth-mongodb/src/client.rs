//! OAuth client storage.
//!
//! Key-value persistence for client registrations. No TTL index: client
//! records do not expire.

use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use bastille_auth::storage::ClientStorage;
use bastille_auth::types::Client;
use bastille_auth::{StorageError, StorageResult};

use crate::config::ClientStoreConfig;
use crate::{backend_error, insert_error};

/// Client document as stored in MongoDB.
#[derive(Debug, Serialize, Deserialize)]
struct ClientDocument {
    /// Client id, primary key.
    #[serde(rename = "_id")]
    id: String,
    secret: String,
    domain: String,
    user_id: String,
}

impl From<&Client> for ClientDocument {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            secret: client.secret.clone(),
            domain: client.domain.clone(),
            user_id: client.user_id.clone(),
        }
    }
}

impl From<ClientDocument> for Client {
    fn from(doc: ClientDocument) -> Self {
        Self {
            id: doc.id,
            secret: doc.secret,
            domain: doc.domain,
            user_id: doc.user_id,
        }
    }
}

/// MongoDB storage for OAuth 2.0 client registrations.
#[derive(Debug, Clone)]
pub struct MongoClientStore {
    collection: Collection<ClientDocument>,
}

impl MongoClientStore {
    /// Create a store over an existing database handle.
    #[must_use]
    pub fn new(db: &Database, config: &ClientStoreConfig) -> Self {
        Self {
            collection: db.collection(&config.clients),
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
        Ok(Self::new(&db, &ClientStoreConfig::default()))
    }
}

#[async_trait]
impl ClientStorage for MongoClientStore {
    async fn register(&self, client: &Client) -> StorageResult<()> {
        self.collection
            .insert_one(ClientDocument::from(client))
            .await
            .map_err(|err| insert_error(err, &client.id))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Client> {
        let doc = self
            .collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|err| backend_error("find client", err))?
            .ok_or_else(|| StorageError::not_found(format!("client {id}")))?;
        Ok(doc.into())
    }

    async fn revoke(&self, id: &str) -> StorageResult<()> {
        // Deleting a missing id matches zero documents, which is success:
        // revocation is idempotent.
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|err| backend_error("delete client", err))?;
        Ok(())
    }
}
