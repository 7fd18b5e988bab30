// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! JWT claims and authenticated user representation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried in every access token.
///
/// All four fields are covered by the HMAC signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the normalized email of the account
    pub sub: String,

    /// Granted roles, serialized as upper-case names
    #[serde(default)]
    pub roles: BTreeSet<Role>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Identity attached to a request after its token has been validated.
///
/// Created by the edge filter, read by handlers, dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Normalized email (token subject)
    pub subject: String,

    /// Roles granted to the subject
    #[schema(value_type = Vec<Role>)]
    pub roles: BTreeSet<Role>,
}

impl AuthenticatedUser {
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Create from validated token claims.
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
        }
    }

    /// Exact membership check; no role implies another.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.contains(&required)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
