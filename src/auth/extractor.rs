// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::filter::{USER_ID_HEADER, USER_ROLES_HEADER};
use super::guard::require_role;
use super::{AuthError, AuthenticatedUser, Role};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Prefers the identity the edge filter left in request extensions. When a
/// handler is mounted without the filter, the bearer token is validated here
/// instead.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let user = state.edge_filter.validator().validate(token).map_err(|e| {
            tracing::debug!(reason = e.kind(), "Rejected bearer token in extractor");
            AuthError::from(e)
        })?;

        Ok(Auth(user))
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        require_role(&user, Role::Admin)?;
        Ok(AdminOnly(user))
    }
}

/// Identity as propagated by the edge filter in `X-Auth-User-ID` /
/// `X-Auth-User-Roles`.
///
/// This is how services behind the gateway learn who is calling without
/// seeing the token. The headers are trusted only because the filter
/// rewrites them on every request.
pub struct ForwardedUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ForwardedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::Unauthorized)?;

        let roles = match parts.headers.get(USER_ROLES_HEADER) {
            Some(value) => {
                let value = value.to_str().map_err(|_| AuthError::Unauthorized)?;
                Role::parse_list(value).map_err(|_| AuthError::Unauthorized)?
            }
            None => Default::default(),
        };

        Ok(ForwardedUser(AuthenticatedUser {
            subject: subject.to_string(),
            roles,
        }))
    }
}
