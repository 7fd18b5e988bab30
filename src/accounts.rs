// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Registration, login and admin bootstrap.
//!
//! Argon2 work runs on the blocking pool.

use std::collections::BTreeSet;

use secrecy::ExposeSecret;

use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::auth::{AuthError, IssuedToken, Role};
use crate::config::SeedAdmin;
use crate::error::ApiError;
use crate::models::RegisterRequest;
use crate::state::AppState;
use crate::store::{normalize_email, StoreError, StoredUser, UserUpdate};

async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task failed: {e}")))
}

async fn hash(password: String) -> Result<String, ApiError> {
    run_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::internal("Internal server error")
        })
}

/// Create a `USER` account.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<StoredUser, ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    if state.users.read().await.exists_by_email(&email) {
        return Err(StoreError::DuplicateEmail.into());
    }

    let password_hash = hash(request.password).await?;
    let user = StoredUser::new(request.name.trim(), &email, password_hash);

    // Uniqueness is re-checked under the write lock.
    let user = state.users.write().await.insert(user)?;
    tracing::info!(user_id = %user.id, subject = %user.email, "Registered user");
    Ok(user)
}

/// Verify credentials and issue a token.
///
/// Unknown email and wrong password both come back as
/// [`AuthError::InvalidCredentials`] after the same amount of hashing work.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
    let subject = normalize_email(email);
    let user = state.users.read().await.find_by_email(&subject);

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = password.to_string();
    let verified = run_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_dummy(&password),
    })
    .await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(subject = %subject, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let issued = state.issuer.issue(&user.email, &user.roles)?;
    tracing::info!(subject = %user.email, "Login succeeded");
    Ok(issued)
}

/// Make sure the configured bootstrap account exists and holds `ADMIN`.
pub async fn seed_admin(state: &AppState, seed: &SeedAdmin) -> Result<StoredUser, ApiError> {
    let existing = state.users.read().await.find_by_email(&seed.email);

    if let Some(existing) = existing {
        if existing.roles.contains(&Role::Admin) {
            return Ok(existing);
        }

        let mut roles = existing.roles.clone();
        roles.insert(Role::Admin);
        let user = state.users.write().await.update(
            &existing.id,
            UserUpdate {
                roles: Some(roles),
                ..Default::default()
            },
        )?;
        tracing::info!(subject = %user.email, "Granted ADMIN to seed account");
        return Ok(user);
    }

    let password_hash = hash(seed.password.expose_secret().to_string()).await?;
    let mut user = StoredUser::new("Administrator", &seed.email, password_hash);
    user.roles = BTreeSet::from([Role::User, Role::Admin]);

    let user = state.users.write().await.insert(user)?;
    tracing::info!(subject = %user.email, "Seeded admin account");
    Ok(user)
}
