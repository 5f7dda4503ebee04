//! In-memory token grant storage.
//!
//! Same physical layout as the document-store backend: a grant map holding
//! serialized payloads, plus one index map per token kind pointing back at
//! the grant map. The writes in [`issue`](InMemoryTokenStore::issue) take
//! each map's lock separately, so a grant is not made visible atomically;
//! readers racing an issuance see `NotFound`, exactly as against the real
//! store.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use bastille_auth::storage::TokenStorage;
use bastille_auth::types::Token;
use bastille_auth::{GrantExpiry, StorageError, StorageResult};

/// Grant record: serialized payload plus its own expiration.
#[derive(Debug, Clone)]
struct GrantRecord {
    payload: Vec<u8>,
    expires_at: OffsetDateTime,
}

/// Index record: maps a bare token string to a grant record id.
#[derive(Debug, Clone)]
struct IndexRecord {
    basic_id: String,
    expires_at: OffsetDateTime,
}

fn live(expires_at: OffsetDateTime) -> bool {
    expires_at > OffsetDateTime::now_utc()
}

/// In-memory storage for token grants.
///
/// Expired entries are invisible to reads and removed by
/// [`purge_expired`](Self::purge_expired).
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    grants: RwLock<HashMap<String, GrantRecord>>,
    access: RwLock<HashMap<String, IndexRecord>>,
    refresh: RwLock<HashMap<String, IndexRecord>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of grant records, including expired ones not yet purged.
    pub async fn grant_count(&self) -> usize {
        self.grants.read().await.len()
    }

    /// Number of access-token index records.
    pub async fn access_index_count(&self) -> usize {
        self.access.read().await.len()
    }

    /// Number of refresh-token index records.
    pub async fn refresh_index_count(&self) -> usize {
        self.refresh.read().await.len()
    }

    /// Remove every record whose expiration has passed, returning how many
    /// were removed. Plays the role of the document store's TTL reclamation.
    pub async fn purge_expired(&self) -> u64 {
        let mut removed = 0;

        let mut grants = self.grants.write().await;
        let before = grants.len();
        grants.retain(|_, record| live(record.expires_at));
        removed += before - grants.len();
        drop(grants);

        for index in [&self.access, &self.refresh] {
            let mut entries = index.write().await;
            let before = entries.len();
            entries.retain(|_, record| live(record.expires_at));
            removed += before - entries.len();
        }

        removed as u64
    }

    async fn insert_grant(
        &self,
        id: String,
        payload: Vec<u8>,
        expires_at: OffsetDateTime,
    ) -> StorageResult<()> {
        let mut grants = self.grants.write().await;
        if grants.contains_key(&id) {
            return Err(StorageError::duplicate_key(&id));
        }
        grants.insert(id, GrantRecord {
            payload,
            expires_at,
        });
        Ok(())
    }

    async fn insert_index(
        &self,
        index: &RwLock<HashMap<String, IndexRecord>>,
        token: String,
        basic_id: String,
        expires_at: OffsetDateTime,
    ) -> StorageResult<()> {
        let mut entries = index.write().await;
        if entries.contains_key(&token) {
            return Err(StorageError::duplicate_key(&token));
        }
        entries.insert(token, IndexRecord {
            basic_id,
            expires_at,
        });
        Ok(())
    }

    async fn fetch_grant(&self, basic_id: &str) -> StorageResult<Token> {
        let grants = self.grants.read().await;
        let record = grants
            .get(basic_id)
            .filter(|record| live(record.expires_at))
            .ok_or_else(|| StorageError::not_found(format!("grant {basic_id}")))?;

        let token = serde_json::from_slice(&record.payload)?;
        Ok(token)
    }

    async fn lookup_basic_id(
        &self,
        index: &RwLock<HashMap<String, IndexRecord>>,
        token: &str,
    ) -> StorageResult<String> {
        index
            .read()
            .await
            .get(token)
            .filter(|record| live(record.expires_at))
            .map(|record| record.basic_id.clone())
            .ok_or_else(|| StorageError::not_found(format!("token {token}")))
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStore {
    async fn issue(&self, token: &Token) -> StorageResult<()> {
        let payload = serde_json::to_vec(token)?;

        if token.is_code_grant() {
            let expires_at = GrantExpiry::for_code(token);
            return self.insert_grant(token.code.clone(), payload, expires_at).await;
        }

        let expiry = GrantExpiry::for_token(token);
        let basic_id = Uuid::new_v4().to_string();

        // Independent writes: an earlier insert stays in place when a later
        // one fails.
        self.insert_grant(basic_id.clone(), payload, expiry.grant)
            .await?;
        self.insert_index(
            &self.access,
            token.access.clone(),
            basic_id.clone(),
            expiry.access,
        )
        .await?;

        if let Some(refresh_expiry) = expiry.refresh {
            self.insert_index(
                &self.refresh,
                token.refresh.clone(),
                basic_id,
                refresh_expiry,
            )
            .await?;
        }

        Ok(())
    }

    async fn revoke_by_code(&self, code: &str) -> StorageResult<()> {
        self.grants.write().await.remove(code);
        Ok(())
    }

    async fn revoke_by_access(&self, access: &str) -> StorageResult<()> {
        self.access.write().await.remove(access);
        Ok(())
    }

    async fn revoke_by_refresh(&self, refresh: &str) -> StorageResult<()> {
        self.refresh.write().await.remove(refresh);
        Ok(())
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::Duration;

    use super::*;

    fn code_grant(code: &str, lifetime: Duration) -> Token {
        Token {
            client_id: "app-1".into(),
            user_id: "user-9".into(),
            scope: "read".into(),
            code: code.into(),
            code_created_at: OffsetDateTime::now_utc(),
            code_lifetime: lifetime,
            ..Token::default()
        }
    }

    fn access_grant(access: &str, refresh: &str) -> Token {
        let now = OffsetDateTime::now_utc();
        let mut token = Token {
            client_id: "app-1".into(),
            user_id: "user-9".into(),
            scope: "read write".into(),
            access: access.into(),
            access_created_at: now,
            access_lifetime: Duration::hours(1),
            ..Token::default()
        };
        if !refresh.is_empty() {
            token.refresh = refresh.into();
            token.refresh_created_at = now;
            token.refresh_lifetime = Duration::hours(24);
        }
        token
    }

    #[tokio::test]
    async fn test_code_grant_writes_single_record() {
        let store = InMemoryTokenStore::new();
        let token = code_grant("ABC", Duration::minutes(10));

        store.issue(&token).await.unwrap();

        assert_eq!(store.grant_count().await, 1);
        assert_eq!(store.access_index_count().await, 0);
        assert_eq!(store.refresh_index_count().await, 0);

        let grants = store.grants.read().await;
        let record = grants.get("ABC").expect("grant keyed by the code");
        assert_eq!(
            record.expires_at,
            token.code_created_at + token.code_lifetime
        );
    }

    #[tokio::test]
    async fn test_code_grant_resolves_and_revokes() {
        let store = InMemoryTokenStore::new();
        let token = code_grant("ABC", Duration::minutes(10));
        store.issue(&token).await.unwrap();

        let resolved = store.resolve_by_code("ABC").await.unwrap();
        assert_eq!(resolved, token);

        store.revoke_by_code("ABC").await.unwrap();
        let err = store.resolve_by_code("ABC").await.unwrap_err();
        assert!(err.is_not_found());

        // Revoking again stays successful.
        store.revoke_by_code("ABC").await.unwrap();
    }

    #[tokio::test]
    async fn test_access_and_refresh_share_one_grant() {
        let store = InMemoryTokenStore::new();
        let token = access_grant("AT1", "RT1");
        store.issue(&token).await.unwrap();

        assert_eq!(store.grant_count().await, 1);
        assert_eq!(store.access_index_count().await, 1);
        assert_eq!(store.refresh_index_count().await, 1);

        // Both index records point at the same grant record, and the grant
        // record carries the refresh expiry.
        {
            let access = store.access.read().await;
            let refresh = store.refresh.read().await;
            let grants = store.grants.read().await;

            let access_entry = access.get("AT1").unwrap();
            let refresh_entry = refresh.get("RT1").unwrap();
            assert_eq!(access_entry.basic_id, refresh_entry.basic_id);

            let grant = grants.get(&access_entry.basic_id).unwrap();
            assert_eq!(grant.expires_at, refresh_entry.expires_at);
            assert_eq!(
                access_entry.expires_at,
                token.access_created_at + token.access_lifetime
            );
            assert_eq!(
                refresh_entry.expires_at,
                token.refresh_created_at + token.refresh_lifetime
            );
        }

        let by_access = store.resolve_by_access("AT1").await.unwrap();
        let by_refresh = store.resolve_by_refresh("RT1").await.unwrap();
        assert_eq!(by_access, token);
        assert_eq!(by_refresh, token);
    }

    #[tokio::test]
    async fn test_access_only_grant_has_no_refresh_index() {
        let store = InMemoryTokenStore::new();
        let token = access_grant("AT1", "");
        store.issue(&token).await.unwrap();

        assert_eq!(store.refresh_index_count().await, 0);

        let grants = store.grants.read().await;
        let access = store.access.read().await;
        let entry = access.get("AT1").unwrap();
        let grant = grants.get(&entry.basic_id).unwrap();
        assert_eq!(grant.expires_at, entry.expires_at);
    }

    #[tokio::test]
    async fn test_revoking_one_token_leaves_the_sibling() {
        let store = InMemoryTokenStore::new();
        let token = access_grant("AT1", "RT1");
        store.issue(&token).await.unwrap();

        store.revoke_by_access("AT1").await.unwrap();
        assert!(
            store
                .resolve_by_access("AT1")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert_eq!(store.resolve_by_refresh("RT1").await.unwrap(), token);

        // And the other way around, on a fresh pair.
        let token2 = access_grant("AT2", "RT2");
        store.issue(&token2).await.unwrap();
        store.revoke_by_refresh("RT2").await.unwrap();
        assert!(
            store
                .resolve_by_refresh("RT2")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert_eq!(store.resolve_by_access("AT2").await.unwrap(), token2);
    }

    #[tokio::test]
    async fn test_expired_grant_is_unreachable() {
        let store = InMemoryTokenStore::new();
        let mut token = access_grant("AT1", "RT1");
        token.access_created_at = OffsetDateTime::now_utc() - Duration::hours(2);
        token.refresh_created_at = OffsetDateTime::now_utc() - Duration::hours(25);

        store.issue(&token).await.unwrap();

        assert!(
            store
                .resolve_by_access("AT1")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            store
                .resolve_by_refresh("RT1")
                .await
                .unwrap_err()
                .is_not_found()
        );

        // The reclaimer removes all three physical records.
        assert_eq!(store.purge_expired().await, 3);
        assert_eq!(store.grant_count().await, 0);
    }

    #[tokio::test]
    async fn test_dangling_index_resolves_to_not_found() {
        let store = InMemoryTokenStore::new();
        let token = access_grant("AT1", "RT1");
        store.issue(&token).await.unwrap();

        // Reclaim the grant record out from under its index entries, as the
        // store-side TTL sweep can between the two resolution hops.
        let basic_id = store.access.read().await.get("AT1").unwrap().basic_id.clone();
        store.grants.write().await.remove(&basic_id);

        assert!(
            store
                .resolve_by_access("AT1")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            store
                .resolve_by_refresh("RT1")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_reported() {
        let store = InMemoryTokenStore::new();
        store.grants.write().await.insert("ABC".into(), GrantRecord {
            payload: b"not a grant payload".to_vec(),
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        });

        let err = store.resolve_by_code("ABC").await.unwrap_err();
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn test_duplicate_access_token_keeps_earlier_writes() {
        let store = InMemoryTokenStore::new();
        store.issue(&access_grant("AT1", "")).await.unwrap();

        let err = store.issue(&access_grant("AT1", "")).await.unwrap_err();
        assert!(err.is_duplicate_key());

        // The failed issuance's grant record is not rolled back.
        assert_eq!(store.grant_count().await, 2);
        assert_eq!(store.access_index_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuances_stay_distinct() {
        let store = Arc::new(InMemoryTokenStore::new());
        let mut handles = Vec::new();

        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut token = access_grant(&format!("AT{i}"), &format!("RT{i}"));
                token.user_id = format!("user-{i}");
                store.issue(&token).await.unwrap();
                token
            }));
        }

        let mut issued = Vec::new();
        for handle in handles {
            issued.push(handle.await.unwrap());
        }

        assert_eq!(store.grant_count().await, 16);
        for token in issued {
            let resolved = store.resolve_by_access(&token.access).await.unwrap();
            assert_eq!(resolved, token);
            let resolved = store.resolve_by_refresh(&token.refresh).await.unwrap();
            assert_eq!(resolved, token);
        }
    }
}
