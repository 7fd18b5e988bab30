// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a token was rejected by the validator.
///
/// These kinds are for logs and tests only. At the HTTP boundary every one
/// of them becomes [`AuthError::Unauthorized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No token was presented
    #[error("token is missing")]
    Missing,
    /// Token could not be parsed or carries invalid claims
    #[error("token is malformed")]
    Malformed,
    /// Token signature does not verify under the configured secret
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token is authentic but past its expiry
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Stable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Missing => "missing",
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

/// Authentication error type as seen by callers.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or unusable credentials (header, token, or any validator failure)
    #[error("Authentication required")]
    Unauthorized,
    /// Login failed; unknown email and wrong password are indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Authenticated, but lacking the required role
    #[error("Insufficient permissions for this operation")]
    Forbidden,
    /// Server-side failure such as a signing error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Forbidden => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::Unauthorized
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Signing failures are logged where they happen; keep details out of the body.
            AuthError::Internal(_) => "Internal authentication error".to_string(),
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
