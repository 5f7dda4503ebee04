//! Time-to-live index bookkeeping.
//!
//! Each token collection gets a TTL index on `expires_at` so the server
//! reclaims expired records without application-level sweeping. Creation is
//! attempted once per collection name for the lifetime of the process.

use std::collections::HashSet;
use std::sync::{LazyLock, PoisonError, RwLock};
use std::time::Duration;

use bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::warn;

/// Collection names whose TTL index attempt already happened this process.
static INDEXED: LazyLock<RwLock<HashSet<String>>> = LazyLock::new(|| RwLock::new(HashSet::new()));

fn already_indexed(collection: &str) -> bool {
    INDEXED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(collection)
}

fn mark_indexed(collection: &str) {
    INDEXED
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(collection.to_string());
}

/// Ensure `collection` carries a TTL index on `expires_at`.
///
/// A failed attempt is logged, recorded as done, and not retried within the
/// process; the store stays usable without server-side expiration
/// enforcement.
pub(crate) async fn ensure_ttl_index(db: &Database, collection: &str) {
    if already_indexed(collection) {
        return;
    }

    // expireAfterSeconds = 0: the document is reclaimed once the wall clock
    // passes the stamped `expires_at`.
    let index = IndexModel::builder()
        .keys(doc! { "expires_at": 1 })
        .options(IndexOptions::builder().expire_after(Duration::ZERO).build())
        .build();

    if let Err(err) = db
        .collection::<Document>(collection)
        .create_index(index)
        .await
    {
        warn!(
            collection,
            error = %err,
            "TTL index creation failed; expired records will persist until a manual cleanup"
        );
    }

    mark_indexed(collection);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_records_attempts() {
        assert!(!already_indexed("test_registry_coll_a"));
        mark_indexed("test_registry_coll_a");
        assert!(already_indexed("test_registry_coll_a"));
        assert!(!already_indexed("test_registry_coll_b"));
    }
}
