//! Expiration policy for token grants.
//!
//! All backends stamp expirations computed here, so the policy cannot drift
//! between physical layouts.

use time::OffsetDateTime;

use crate::types::Token;

/// Computed expiration bounds for one access-token issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantExpiry {
    /// Expiry stamped on the grant record itself.
    pub grant: OffsetDateTime,

    /// Expiry stamped on the access-token index record.
    pub access: OffsetDateTime,

    /// Expiry stamped on the refresh-token index record, when a refresh
    /// token was issued.
    pub refresh: Option<OffsetDateTime>,
}

impl GrantExpiry {
    /// Compute the expiration bounds for an access-token issuance.
    ///
    /// The grant record carries the refresh expiry when a refresh token is
    /// present, otherwise the access expiry. The access index is clamped to
    /// the refresh expiry when it would outlive it, so a refresh token always
    /// outlives or equals its access token. The clamp comparison is made on
    /// whole seconds; sub-second differences do not change which bound wins.
    #[must_use]
    pub fn for_token(token: &Token) -> Self {
        let mut access = token.access_created_at + token.access_lifetime;
        let mut grant = access;
        let mut refresh = None;

        if token.has_refresh() {
            let refresh_expiry = token.refresh_created_at + token.refresh_lifetime;
            if access.unix_timestamp() > refresh_expiry.unix_timestamp() {
                access = refresh_expiry;
            }
            grant = refresh_expiry;
            refresh = Some(refresh_expiry);
        }

        Self {
            grant,
            access,
            refresh,
        }
    }

    /// Expiration of a code-only grant record.
    #[must_use]
    pub fn for_code(token: &Token) -> OffsetDateTime {
        token.code_created_at + token.code_lifetime
    }
}
