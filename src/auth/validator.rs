// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Token validation and claims extraction.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. presence
//! 2. structure (three segments, parseable header and claims)
//! 3. signature
//! 4. expiry
//!
//! Only a token that clears all four becomes an [`AuthenticatedUser`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::codec::{CodecError, TokenCodec};
use super::{AuthenticatedUser, TokenError};

/// Validates bearer tokens against the shared secret.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
    leeway: Duration,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>, leeway: Duration) -> Self {
        Self { codec, leeway }
    }

    /// Validate a token as of the current time.
    pub fn validate(&self, token: Option<&str>) -> Result<AuthenticatedUser, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    pub fn validate_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, TokenError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Missing)?;

        let claims = self.codec.decode(token).map_err(|e| match e {
            CodecError::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;

        if now.timestamp() >= claims.exp.saturating_add(self.leeway.num_seconds()) {
            return Err(TokenError::Expired);
        }

        Ok(AuthenticatedUser::from_claims(claims))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::auth::{guard::require_role, AuthError, Role};

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(TEST_SECRET))
    }

    fn user_roles() -> BTreeSet<Role> {
        [Role::User].into_iter().collect()
    }

    #[test]
    fn fresh_token_yields_context() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let token = codec()
            .encode("alice@example.com", &user_roles(), Utc::now(), Duration::hours(1))
            .unwrap();

        let user = validator.validate(Some(token.as_str())).unwrap();
        assert_eq!(user, AuthenticatedUser::new("alice@example.com", [Role::User]));
        assert!(matches!(
            require_role(&user, Role::Admin),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn missing_or_blank_token_is_missing() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        assert_eq!(validator.validate(None), Err(TokenError::Missing));
        assert_eq!(validator.validate(Some("   ")), Err(TokenError::Missing));
    }

    #[test]
    fn garbage_is_malformed() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        assert_eq!(
            validator.validate(Some("not-a-jwt")),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn foreign_secret_is_invalid_signature() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let foreign = TokenCodec::new(b"another-secret-key-that-is-also-32-chars-long");
        let token = foreign
            .encode("alice@example.com", &user_roles(), Utc::now(), Duration::hours(1))
            .unwrap();

        assert_eq!(
            validator.validate(Some(token.as_str())),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn past_expiry_is_expired_not_invalid_signature() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let token = codec()
            .encode(
                "alice@example.com",
                &user_roles(),
                Utc::now() - Duration::hours(2),
                Duration::hours(1),
            )
            .unwrap();

        assert_eq!(validator.validate(Some(token.as_str())), Err(TokenError::Expired));
    }

    #[test]
    fn expired_and_foreign_reports_signature_first() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let foreign = TokenCodec::new(b"another-secret-key-that-is-also-32-chars-long");
        let token = foreign
            .encode(
                "alice@example.com",
                &user_roles(),
                Utc::now() - Duration::hours(2),
                Duration::hours(1),
            )
            .unwrap();

        assert_eq!(
            validator.validate(Some(token.as_str())),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let issued_at = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let token = codec()
            .encode("alice@example.com", &user_roles(), issued_at, Duration::seconds(60))
            .unwrap();

        let just_before = issued_at + Duration::seconds(59);
        let at_expiry = issued_at + Duration::seconds(60);
        assert!(validator.validate_at(Some(token.as_str()), just_before).is_ok());
        assert_eq!(
            validator.validate_at(Some(token.as_str()), at_expiry),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn leeway_extends_acceptance() {
        let validator = TokenValidator::new(codec(), Duration::seconds(30));
        let issued_at = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let token = codec()
            .encode("alice@example.com", &user_roles(), issued_at, Duration::seconds(60))
            .unwrap();

        assert!(validator
            .validate_at(Some(token.as_str()), issued_at + Duration::seconds(80))
            .is_ok());
        assert_eq!(
            validator.validate_at(Some(token.as_str()), issued_at + Duration::seconds(90)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn revalidation_is_idempotent() {
        let validator = TokenValidator::new(codec(), Duration::zero());
        let roles: BTreeSet<Role> = [Role::Admin, Role::User].into_iter().collect();
        let token = codec()
            .encode("alice@example.com", &roles, Utc::now(), Duration::hours(1))
            .unwrap();

        let first = validator.validate(Some(token.as_str())).unwrap();
        for _ in 0..5 {
            assert_eq!(validator.validate(Some(token.as_str())).unwrap(), first);
        }
    }
}
