//! In-memory OAuth client storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bastille_auth::storage::ClientStorage;
use bastille_auth::types::Client;
use bastille_auth::{StorageError, StorageResult};

/// In-memory storage for OAuth 2.0 client registrations.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    clients: RwLock<HashMap<String, Client>>,
}

impl InMemoryClientStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered clients.
    pub async fn count(&self) -> usize {
        self.clients.read().await.len()
    }
}

#[async_trait]
impl ClientStorage for InMemoryClientStore {
    async fn register(&self, client: &Client) -> StorageResult<()> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(&client.id) {
            return Err(StorageError::duplicate_key(&client.id));
        }
        clients.insert(client.id.clone(), client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Client> {
        self.clients
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(format!("client {id}")))
    }

    async fn revoke(&self, id: &str) -> StorageResult<()> {
        // Idempotent: removing a missing id is success.
        self.clients.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(id: &str) -> Client {
        Client::new(id, "s3cret", "https://app.example.com", "user-9")
    }

    #[tokio::test]
    async fn test_register_then_lookup_round_trips() {
        let store = InMemoryClientStore::new();
        let client = test_client("app-1");

        store.register(&client).await.unwrap();
        assert_eq!(store.count().await, 1);

        let found = store.find_by_id("app-1").await.unwrap();
        assert_eq!(found, client);
    }

    #[tokio::test]
    async fn test_register_duplicate_id_fails() {
        let store = InMemoryClientStore::new();
        store.register(&test_client("app-1")).await.unwrap();

        let err = store.register(&test_client("app-1")).await.unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[tokio::test]
    async fn test_lookup_missing_client_is_not_found() {
        let store = InMemoryClientStore::new();
        let err = store.find_by_id("absent").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = InMemoryClientStore::new();
        store.register(&test_client("app-1")).await.unwrap();

        store.revoke("app-1").await.unwrap();
        assert!(store.find_by_id("app-1").await.unwrap_err().is_not_found());

        // A second revoke, and a revoke of an id that never existed, both
        // succeed.
        store.revoke("app-1").await.unwrap();
        store.revoke("never-registered").await.unwrap();
    }
}
