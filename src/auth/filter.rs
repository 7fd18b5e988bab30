// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Edge authentication filter.
//!
//! Runs once per inbound request in front of every route:
//!
//! - Paths on the open allowlist pass through without a token.
//! - Every other path needs `Authorization: Bearer <token>`; anything short
//!   of a valid token is answered with one uniform 401.
//! - Accepted requests are forwarded with the validated identity in
//!   [`USER_ID_HEADER`] / [`USER_ROLES_HEADER`] and in request extensions.
//!
//! Client-supplied copies of the propagation headers are always dropped
//! first, on open paths too, so they can only ever carry what this filter
//! wrote.

use axum::{
    extract::{Request, State},
    http::{
        header::{HeaderName, AUTHORIZATION},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser, Role, TokenError, TokenValidator};
use crate::state::AppState;

/// Subject of the validated token, for downstream handlers.
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-auth-user-id");

/// Comma-separated roles of the validated token.
pub const USER_ROLES_HEADER: HeaderName = HeaderName::from_static("x-auth-user-roles");

const BEARER_PREFIX: &str = "Bearer ";

/// Paths that skip token validation.
///
/// Entries match exactly, except that an entry ending in `/**` matches
/// its prefix and everything below it.
#[derive(Debug, Clone, Default)]
pub struct OpenPaths {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl OpenPaths {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            match entry.strip_suffix("/**") {
                Some(prefix) => paths.prefixes.push(prefix.to_string()),
                None => paths.exact.push(entry.to_string()),
            }
        }
        paths
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path)
            || self.prefixes.iter().any(|prefix| {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
    }
}

/// Outcome of running the filter's checks on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Allowlisted path; no identity attached
    Open,
    /// Token accepted
    Authenticated(AuthenticatedUser),
}

/// The edge filter: allowlist plus validator.
#[derive(Debug, Clone)]
pub struct EdgeFilter {
    validator: TokenValidator,
    open_paths: OpenPaths,
}

impl EdgeFilter {
    pub fn new(validator: TokenValidator, open_paths: OpenPaths) -> Self {
        Self {
            validator,
            open_paths,
        }
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Decide whether a request to `path` with `headers` may proceed.
    pub fn admit(&self, path: &str, headers: &HeaderMap) -> Result<Admission, AuthError> {
        if self.open_paths.is_open(path) {
            return Ok(Admission::Open);
        }

        let user = bearer_token(headers)
            .and_then(|token| self.validator.validate(Some(token)))
            .map_err(|e| {
                tracing::debug!(path, reason = e.kind(), "Rejected request at edge");
                AuthError::from(e)
            })?;

        Ok(Admission::Authenticated(user))
    }

    /// Produce the request to hand downstream, or the rejection to send back.
    pub fn forward(&self, request: Request) -> Result<Request, AuthError> {
        let (mut parts, body) = request.into_parts();

        let admission = self.admit(parts.uri.path(), &parts.headers)?;
        parts.headers = forwarded_headers(&parts.headers, &admission)?;

        if let Admission::Authenticated(user) = admission {
            parts.extensions.insert(user);
        }

        Ok(Request::from_parts(parts, body))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers.get(AUTHORIZATION).ok_or(TokenError::Missing)?;
    let value = value.to_str().map_err(|_| TokenError::Malformed)?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(TokenError::Malformed)
}

/// Copy `inbound`, replacing any propagation headers with the validated identity.
pub fn forwarded_headers(
    inbound: &HeaderMap,
    admission: &Admission,
) -> Result<HeaderMap, AuthError> {
    let mut headers = inbound.clone();

    for name in [USER_ID_HEADER, USER_ROLES_HEADER] {
        if headers.remove(&name).is_some() {
            tracing::warn!(header = %name, "Dropped client-supplied identity header");
        }
    }

    if let Admission::Authenticated(user) = admission {
        let subject = HeaderValue::from_str(&user.subject).map_err(|_| AuthError::Unauthorized)?;
        let roles =
            HeaderValue::from_str(&Role::join(&user.roles)).map_err(|_| AuthError::Unauthorized)?;
        headers.insert(USER_ID_HEADER, subject);
        headers.insert(USER_ROLES_HEADER, roles);
    }

    Ok(headers)
}

/// Axum middleware wrapping [`EdgeFilter::forward`].
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/mood", get(list_moods))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), edge_auth));
/// ```
pub async fn edge_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match state.edge_filter.forward(request) {
        Ok(request) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
