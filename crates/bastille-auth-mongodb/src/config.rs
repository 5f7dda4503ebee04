//! Collection-name configuration.

use serde::{Deserialize, Serialize};

/// Collection names used by [`MongoClientStore`](crate::MongoClientStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientStoreConfig {
    /// Collection holding client registrations.
    pub clients: String,
}

impl Default for ClientStoreConfig {
    fn default() -> Self {
        Self {
            clients: "oauth2_clients".to_string(),
        }
    }
}

/// Collection names used by [`MongoTokenStore`](crate::MongoTokenStore).
///
/// Each collection gets its own TTL index on `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenStoreConfig {
    /// Collection holding grant records (serialized grant payloads).
    pub basic: String,

    /// Collection mapping access-token strings to grant records.
    pub access: String,

    /// Collection mapping refresh-token strings to grant records.
    pub refresh: String,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            basic: "oauth2_basic".to_string(),
            access: "oauth2_access".to_string(),
            refresh: "oauth2_refresh".to_string(),
        }
    }
}
