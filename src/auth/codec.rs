// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Signed token encoding and decoding.
//!
//! Tokens are compact JWS (`header.payload.signature`) signed with HS256
//! over a shared secret. The codec checks structure and signature only;
//! expiry is the validator's concern, so an expired but authentic token
//! decodes successfully here.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::TokenClaims;
use super::roles::Role;

/// Signing algorithm shared by every service that trusts these tokens.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Codec failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Token structure, header, or claims could not be parsed
    #[error("token is malformed")]
    Malformed,
    /// Signature does not verify under the configured secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Refused to mint a token whose expiry is not after its issue time
    #[error("token lifetime must be positive")]
    NonPositiveTtl,
    /// Expiry falls outside the representable date range
    #[error("token lifetime is too large")]
    TtlOutOfRange,
    /// Underlying signer failed
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// HS256 token codec bound to one shared secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec over the raw secret bytes.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked by the validator so it can report it separately.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `subject` with `roles`, valid from `issued_at` for `ttl`.
    pub fn encode(
        &self,
        subject: &str,
        roles: &BTreeSet<Role>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, CodecError> {
        if ttl <= Duration::zero() {
            return Err(CodecError::NonPositiveTtl);
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(CodecError::TtlOutOfRange)?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: roles.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        // Sub-second TTLs can collapse onto the same second.
        if claims.exp <= claims.iat {
            return Err(CodecError::NonPositiveTtl);
        }

        Ok(encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)?)
    }

    /// Verify the signature and parse the claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, CodecError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CodecError::InvalidSignature
                }
                _ => CodecError::Malformed,
            },
        )?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() || claims.exp <= claims.iat {
            return Err(CodecError::Malformed);
        }

        Ok(claims)
    }
}
