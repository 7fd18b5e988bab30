// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Account endpoints: registration, login and admin user management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    accounts,
    auth::{AdminOnly, Auth, AuthError},
    error::ApiError,
    models::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserProfile},
    state::AppState,
    store::UserUpdate,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Missing name, password or valid email"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let user = accounts::register(&state, request).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Access token", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let issued = accounts::login(&state, &request.email, &request.password).await?;
    Ok(Json(LoginResponse::bearer(issued.token, issued.expires_at)))
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserProfile>, ApiError> {
    let stored = state
        .users
        .read()
        .await
        .find_by_email(&user.subject)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserProfile::from(&stored)))
}

#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [UserProfile]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "ADMIN role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminOnly(_admin): AdminOnly,
) -> Json<Vec<UserProfile>> {
    let users = state.users.read().await.list();
    Json(users.iter().map(UserProfile::from).collect())
}

#[utoipa::path(
    put,
    path = "/api/auth/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 400, description = "Invalid field value"),
        (status = 403, description = "ADMIN role required"),
        (status = 404, description = "Unknown user"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let update = UserUpdate::try_from(request)?;

    // Lock order is users then moods.
    let mut users = state.users.write().await;
    let previous_email = users.get(&id)?.email;
    let user = users.update(&id, update)?;

    if user.email != previous_email {
        let moved = state
            .moods
            .write()
            .await
            .reassign_user(&previous_email, &user.email);
        tracing::info!(user_id = %id, moods = moved, "Moved mood entries to new email");
    }
    drop(users);

    tracing::info!(user_id = %id, by = %admin.subject, "Updated user");
    Ok(Json(UserProfile::from(&user)))
}

/// Delete an account together with its mood entries.
#[utoipa::path(
    delete,
    path = "/api/auth/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 403, description = "ADMIN role required"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
) -> Result<StatusCode, ApiError> {
    let mut users = state.users.write().await;
    let user = users.delete(&id)?;
    let moods = state.moods.write().await.delete_for_user(&user.email);
    drop(users);

    tracing::info!(user_id = %id, moods, by = %admin.subject, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role};
    use crate::config::Settings;
    use chrono::Utc;

    fn admin() -> AdminOnly {
        AdminOnly(AuthenticatedUser::new("root@example.com", [Role::Admin]))
    }

    async fn registered(state: &AppState, email: &str) -> UserProfile {
        let (_, Json(profile)) = register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Alice".into(),
                email: email.into(),
                password: "pw".into(),
            }),
        )
        .await
        .expect("registration succeeds");
        profile
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = AppState::new(Settings::for_tests());
        let profile = registered(&state, "alice@example.com").await;
        assert_eq!(profile.email, "alice@example.com");

        let Json(response) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "pw".into(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.token_type, "Bearer");
        assert!(response.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn me_returns_profile_or_not_found() {
        let state = AppState::new(Settings::for_tests());
        registered(&state, "alice@example.com").await;

        let caller = AuthenticatedUser::new("alice@example.com", [Role::User]);
        let Json(profile) = me(State(state.clone()), Auth(caller)).await.unwrap();
        assert_eq!(profile.name, "Alice");

        let ghost = AuthenticatedUser::new("ghost@example.com", [Role::User]);
        let err = me(State(state), Auth(ghost)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_updates_and_deletes_users() {
        let state = AppState::new(Settings::for_tests());
        let profile = registered(&state, "alice@example.com").await;
        state
            .moods
            .write()
            .await
            .create("alice@example.com", 6, None, Utc::now());

        let Json(updated) = update_user(
            Path(profile.id.clone()),
            State(state.clone()),
            admin(),
            Json(UpdateUserRequest {
                roles: Some([Role::User, Role::Psychologist].into_iter().collect()),
                notification_interval: Some(8),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert!(updated.roles.contains(&Role::Psychologist));
        assert_eq!(updated.notification_interval, 8);

        let status = delete_user(Path(profile.id.clone()), State(state.clone()), admin())
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.users.read().await.is_empty());
        assert!(state
            .moods
            .read()
            .await
            .list_for_user("alice@example.com")
            .is_empty());

        let err = delete_user(Path(profile.id), State(state), admin())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_users_returns_profiles() {
        let state = AppState::new(Settings::for_tests());
        registered(&state, "alice@example.com").await;
        registered(&state, "bob@example.com").await;

        let Json(users) = list_users(State(state), admin()).await;
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn email_change_carries_mood_entries() {
        let state = AppState::new(Settings::for_tests());
        let profile = registered(&state, "alice@example.com").await;
        state
            .moods
            .write()
            .await
            .create("alice@example.com", 4, Some("private".into()), Utc::now());

        let Json(updated) = update_user(
            Path(profile.id.clone()),
            State(state.clone()),
            admin(),
            Json(UpdateUserRequest {
                email: Some("Alice.New@example.com".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.email, "alice.new@example.com");

        let moods = state.moods.read().await;
        assert!(moods.list_for_user("alice@example.com").is_empty());
        let moved = moods.list_for_user("alice.new@example.com");
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].note.as_deref(), Some("private"));
        drop(moods);

        // Deleting the renamed account leaves nothing behind under either email.
        delete_user(Path(profile.id), State(state.clone()), admin())
            .await
            .unwrap();
        assert!(state.moods.read().await.list_for_user("alice.new@example.com").is_empty());
    }

    #[tokio::test]
    async fn updating_unknown_user_is_not_found() {
        let state = AppState::new(Settings::for_tests());
        let err = update_user(
            Path("missing".into()),
            State(state),
            admin(),
            Json(UpdateUserRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
