//! Token grant domain type.
//!
//! A [`Token`] describes one full token issuance event: the authorization
//! code, access token and refresh token issued together, each with its own
//! creation time and lifetime. The whole structure is serialized as the
//! grant-record payload; an empty token string means "not issued".

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Capability view of a token grant.
///
/// Stores consume this contract to compute physical layout and expirations;
/// everything else rides along inside the serialized payload.
pub trait TokenInfo {
    /// The client the grant was issued to.
    fn client_id(&self) -> &str;

    /// The user that authorized the grant.
    fn user_id(&self) -> &str;

    /// The redirect URI bound to the grant.
    fn redirect_uri(&self) -> &str;

    /// Granted scopes, space-separated.
    fn scope(&self) -> &str;

    /// The authorization code, empty when none was issued.
    fn code(&self) -> &str;

    /// When the authorization code was created.
    fn code_created_at(&self) -> OffsetDateTime;

    /// How long the authorization code lives.
    fn code_lifetime(&self) -> Duration;

    /// The access token, empty when none was issued.
    fn access(&self) -> &str;

    /// When the access token was created.
    fn access_created_at(&self) -> OffsetDateTime;

    /// How long the access token lives.
    fn access_lifetime(&self) -> Duration;

    /// The refresh token, empty when none was issued.
    fn refresh(&self) -> &str;

    /// When the refresh token was created.
    fn refresh_created_at(&self) -> OffsetDateTime;

    /// How long the refresh token lives.
    fn refresh_lifetime(&self) -> Duration;
}

/// One OAuth2 token issuance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
    /// Client the grant was issued to.
    pub client_id: String,

    /// User that authorized the grant.
    pub user_id: String,

    /// Redirect URI bound to the grant.
    pub redirect_uri: String,

    /// Granted scopes, space-separated.
    pub scope: String,

    /// Authorization code, empty when none was issued.
    pub code: String,

    /// Creation time of the authorization code.
    #[serde(with = "time::serde::rfc3339")]
    pub code_created_at: OffsetDateTime,

    /// Lifetime of the authorization code.
    pub code_lifetime: Duration,

    /// Access token, empty when none was issued.
    pub access: String,

    /// Creation time of the access token.
    #[serde(with = "time::serde::rfc3339")]
    pub access_created_at: OffsetDateTime,

    /// Lifetime of the access token.
    pub access_lifetime: Duration,

    /// Refresh token, empty when none was issued.
    pub refresh: String,

    /// Creation time of the refresh token.
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_created_at: OffsetDateTime,

    /// Lifetime of the refresh token.
    pub refresh_lifetime: Duration,
}

impl Token {
    /// Returns `true` for the pure "exchange a code later" case: a code was
    /// issued and no access token exists yet. Such grants are stored as a
    /// single grant record keyed by the code string, with no index records.
    #[must_use]
    pub fn is_code_grant(&self) -> bool {
        !self.code.is_empty() && self.access.is_empty()
    }

    /// Returns `true` if a refresh token was issued alongside the access
    /// token.
    #[must_use]
    pub fn has_refresh(&self) -> bool {
        !self.refresh.is_empty()
    }
}

impl Default for Token {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            user_id: String::new(),
            redirect_uri: String::new(),
            scope: String::new(),
            code: String::new(),
            code_created_at: OffsetDateTime::UNIX_EPOCH,
            code_lifetime: Duration::ZERO,
            access: String::new(),
            access_created_at: OffsetDateTime::UNIX_EPOCH,
            access_lifetime: Duration::ZERO,
            refresh: String::new(),
            refresh_created_at: OffsetDateTime::UNIX_EPOCH,
            refresh_lifetime: Duration::ZERO,
        }
    }
}

impl TokenInfo for Token {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn code_created_at(&self) -> OffsetDateTime {
        self.code_created_at
    }

    fn code_lifetime(&self) -> Duration {
        self.code_lifetime
    }

    fn access(&self) -> &str {
        &self.access
    }

    fn access_created_at(&self) -> OffsetDateTime {
        self.access_created_at
    }

    fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    fn refresh(&self) -> &str {
        &self.refresh
    }

    fn refresh_created_at(&self) -> OffsetDateTime {
        self.refresh_created_at
    }

    fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_code_grant_detection() {
        let code_only = Token {
            code: "ABC".into(),
            ..Token::default()
        };
        assert!(code_only.is_code_grant());

        let access_only = Token {
            access: "AT1".into(),
            ..Token::default()
        };
        assert!(!access_only.is_code_grant());

        // A code carried alongside an access token is not a code-only grant.
        let both = Token {
            code: "ABC".into(),
            access: "AT1".into(),
            ..Token::default()
        };
        assert!(!both.is_code_grant());
    }

    #[test]
    fn test_payload_round_trip() {
        let token = Token {
            client_id: "app-1".into(),
            user_id: "user-9".into(),
            redirect_uri: "https://app.example.com/cb".into(),
            scope: "read write".into(),
            access: "AT1".into(),
            access_created_at: datetime!(2024-06-01 12:00:00 UTC),
            access_lifetime: Duration::hours(1),
            refresh: "RT1".into(),
            refresh_created_at: datetime!(2024-06-01 12:00:00 UTC),
            refresh_lifetime: Duration::hours(24),
            ..Token::default()
        };

        let payload = serde_json::to_vec(&token).unwrap();
        let back: Token = serde_json::from_slice(&payload).unwrap();
        assert_eq!(back, token);
    }
}
