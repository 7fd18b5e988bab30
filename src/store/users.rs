// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! User account store.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::auth::Role;

/// Default reminder interval for new accounts, in hours.
pub const DEFAULT_NOTIFICATION_INTERVAL: u32 = 4;

/// Canonical form of an email used as account key and token subject.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A user account. The password hash never leaves this type through the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: String,
    /// Normalized email
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub roles: BTreeSet<Role>,
    pub notification_enabled: bool,
    /// Hours between mood reminders
    pub notification_interval: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredUser {
    /// New account with the default `USER` role.
    pub fn new(name: impl Into<String>, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: normalize_email(email),
            password_hash,
            name: name.into(),
            phone: None,
            avatar: None,
            roles: [Role::User].into_iter().collect(),
            notification_enabled: true,
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Partial update applied by an administrator. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub roles: Option<BTreeSet<Role>>,
    pub notification_enabled: Option<bool>,
    pub notification_interval: Option<u32>,
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, StoredUser>,
    /// normalized email -> user id
    by_email: HashMap<String, String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Insert a new account, enforcing email uniqueness.
    pub fn insert(&mut self, mut user: StoredUser) -> StoreResult<StoredUser> {
        user.email = normalize_email(&user.email);
        if self.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        self.by_email.insert(user.email.clone(), user.id.clone());
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub fn get(&self, id: &str) -> StoreResult<StoredUser> {
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("User {id}")))
    }

    /// Look up by email; the argument is normalized first.
    pub fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        self.by_email
            .get(&normalize_email(email))
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    pub fn exists_by_email(&self, email: &str) -> bool {
        self.by_email.contains_key(&normalize_email(email))
    }

    /// All accounts, oldest first.
    pub fn list(&self) -> Vec<StoredUser> {
        let mut users: Vec<_> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        users
    }

    pub fn find_admins(&self) -> Vec<StoredUser> {
        self.list()
            .into_iter()
            .filter(|u| u.roles.contains(&Role::Admin))
            .collect()
    }

    pub fn update(&mut self, id: &str, update: UserUpdate) -> StoreResult<StoredUser> {
        let current = self.get(id)?;

        let new_email = update.email.as_deref().map(normalize_email);
        if let Some(email) = &new_email {
            let taken_by_other = self.by_email.get(email).is_some_and(|owner| owner != id);
            if taken_by_other {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let user = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("User {id}")))?;

        if let Some(email) = new_email {
            self.by_email.remove(&current.email);
            self.by_email.insert(email.clone(), id.to_string());
            user.email = email;
        }
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(roles) = update.roles {
            user.roles = roles;
        }
        if let Some(enabled) = update.notification_enabled {
            user.notification_enabled = enabled;
        }
        if let Some(interval) = update.notification_interval {
            user.notification_interval = interval;
        }
        user.updated_at = Some(Utc::now());

        Ok(user.clone())
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<StoredUser> {
        let user = self
            .users
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("User {id}")))?;
        self.by_email.remove(&user.email);
        Ok(user)
    }
}
