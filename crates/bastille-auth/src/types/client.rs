//! OAuth client domain type.

use serde::{Deserialize, Serialize};

/// Capability view of a registered OAuth2 client.
pub trait ClientInfo {
    /// The client identifier (primary key).
    fn id(&self) -> &str;

    /// The client secret.
    fn secret(&self) -> &str;

    /// The domain the client is registered for.
    fn domain(&self) -> &str;

    /// Identifier of the user that owns this registration.
    fn user_id(&self) -> &str;
}

/// A registered OAuth2 client.
///
/// Plain key-value record with no expiration; lifecycle is register,
/// lookup, revoke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    /// Client identifier, primary key in the client collection.
    pub id: String,

    /// Client secret.
    pub secret: String,

    /// Registered domain.
    pub domain: String,

    /// Identifier of the owning user.
    pub user_id: String,
}

impl Client {
    /// Create a new client registration.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        domain: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            domain: domain.into(),
            user_id: user_id.into(),
        }
    }
}

impl ClientInfo for Client {
    fn id(&self) -> &str {
        &self.id
    }

    fn secret(&self) -> &str {
        &self.secret
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_info_accessors() {
        let client = Client::new("app-1", "s3cret", "https://app.example.com", "user-9");
        assert_eq!(ClientInfo::id(&client), "app-1");
        assert_eq!(client.secret(), "s3cret");
        assert_eq!(client.domain(), "https://app.example.com");
        assert_eq!(ClientInfo::user_id(&client), "user-9");
    }

    #[test]
    fn test_client_serde_round_trip() {
        let client = Client::new("app-1", "s3cret", "https://app.example.com", "user-9");
        let json = serde_json::to_vec(&client).unwrap();
        let back: Client = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, client);
    }
}
