// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! User roles for authorization.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// The set is closed: names outside it are rejected when parsed from a
/// token, a header, or a request body. There is no hierarchy between roles;
/// a user holds exactly the roles granted to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account holder
    User,
    /// Full administrative access
    Admin,
    /// Care provider account
    Psychologist,
}

/// Returned when a role name is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Canonical wire name (upper-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Psychologist => "PSYCHOLOGIST",
        }
    }

    /// Render a role set as the comma-separated form used in propagation headers.
    pub fn join(roles: &BTreeSet<Role>) -> String {
        roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the comma-separated form produced by [`Role::join`].
    ///
    /// Empty segments are ignored; any unknown name fails the whole parse.
    pub fn parse_list(value: &str) -> Result<BTreeSet<Role>, UnknownRole> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Role::from_str)
            .collect()
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive, so stored lower-case names such as `"admin"` still map.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            "PSYCHOLOGIST" => Ok(Role::Psychologist),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
