// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Access token issuance.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::codec::TokenCodec;
use super::{AuthError, Role};

/// A freshly minted access token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    /// Compact JWS for the `Authorization: Bearer` header
    pub token: String,
    /// When the token was minted
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Mints tokens for identities whose password the caller has already verified.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, ttl: Duration) -> Self {
        Self { codec, ttl }
    }

    /// Issue a token valid from now for the configured TTL.
    pub fn issue(&self, subject: &str, roles: &BTreeSet<Role>) -> Result<IssuedToken, AuthError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issue a token as of `now`.
    ///
    /// A failure here means the signing configuration is broken, so it is
    /// reported as an internal error rather than an authentication failure.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &BTreeSet<Role>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let token = self.codec.encode(subject, roles, now, self.ttl).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            AuthError::Internal(e.to_string())
        })?;

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("token expiry out of range".to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn issuer(ttl: Duration) -> TokenIssuer {
        TokenIssuer::new(Arc::new(TokenCodec::new(TEST_SECRET)), ttl)
    }

    #[test]
    fn issue_sets_expiry_from_ttl() {
        let issuer = issuer(Duration::hours(1));
        let roles: BTreeSet<Role> = [Role::User].into_iter().collect();
        let now = DateTime::from_timestamp(1_800_000_000, 0).unwrap();

        let issued = issuer.issue_at("alice@example.com", &roles, now).unwrap();
        assert_eq!(issued.issued_at, now);
        assert_eq!(issued.expires_at, now + Duration::hours(1));

        let claims = TokenCodec::new(TEST_SECRET).decode(&issued.token).unwrap();
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn broken_ttl_is_an_internal_error() {
        let issuer = issuer(Duration::zero());
        let result = issuer.issue("alice@example.com", &BTreeSet::new());
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn overflowing_ttl_is_an_internal_error() {
        let issuer = issuer(Duration::MAX);
        let result = issuer.issue("alice@example.com", &BTreeSet::new());
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
