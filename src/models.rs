// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::error::ApiError;
use crate::store::{StoredUser, UserUpdate};

pub const MIN_MOOD_SCORE: u8 = 1;
pub const MAX_MOOD_SCORE: u8 = 10;

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("Name is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("Password is required"));
        }
        validate_email(&self.email)
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }
}

/// Public view of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[schema(value_type = Vec<Role>)]
    pub roles: BTreeSet<Role>,
    pub notification_enabled: bool,
    pub notification_interval: u32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&StoredUser> for UserProfile {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            avatar: user.avatar.clone(),
            roles: user.roles.clone(),
            notification_enabled: user.notification_enabled,
            notification_interval: user.notification_interval,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    #[schema(value_type = Option<Vec<Role>>)]
    pub roles: Option<BTreeSet<Role>>,
    pub notification_enabled: Option<bool>,
    pub notification_interval: Option<u32>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateUserRequest) -> Result<Self, Self::Error> {
        if let Some(email) = &request.email {
            validate_email(email)?;
        }
        if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::bad_request("Name must not be blank"));
        }

        Ok(UserUpdate {
            name: request.name,
            email: request.email,
            phone: request.phone,
            avatar: request.avatar,
            roles: request.roles,
            notification_enabled: request.notification_enabled,
            notification_interval: request.notification_interval,
        })
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct MoodRequest {
    /// 1 (worst) to 10 (best)
    pub score: u8,
    pub note: Option<String>,
}

impl MoodRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if (MIN_MOOD_SCORE..=MAX_MOOD_SCORE).contains(&self.score) {
            Ok(())
        } else {
            Err(ApiError::bad_request(format!(
                "Score must be between {MIN_MOOD_SCORE} and {MAX_MOOD_SCORE}"
            )))
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// Look-back window such as `7d` or `30d`; omit for all entries.
    pub range: Option<String>,
}

impl AnalyticsQuery {
    /// Start of the requested window relative to `now`.
    pub fn since(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, ApiError> {
        let Some(raw) = self.range.as_deref() else {
            return Ok(None);
        };

        let days = raw
            .trim()
            .strip_suffix('d')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid range '{raw}', expected e.g. 7d")))?;

        Ok(Some(now - Duration::days(i64::from(days))))
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::bad_request("A valid email is required")),
    }
}
