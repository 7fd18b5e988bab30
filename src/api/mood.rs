// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Mood tracking endpoints.
//!
//! The caller is identified solely by the headers the edge filter
//! propagates; handlers here never see the bearer token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::{AuthError, AuthenticatedUser, ForwardedUser},
    error::ApiError,
    models::{AnalyticsQuery, MessageResponse, MoodRequest},
    state::AppState,
    store::{Mood, MoodAnalytics},
};

/// Entries may be changed by whoever recorded them, or by an admin.
fn ensure_can_modify(mood: &Mood, user: &AuthenticatedUser) -> Result<(), ApiError> {
    if mood.user_id == user.subject || user.is_admin() {
        return Ok(());
    }
    tracing::info!(
        subject = %user.subject,
        mood_id = %mood.id,
        "Denied access to another user's mood"
    );
    Err(AuthError::Forbidden.into())
}

#[utoipa::path(
    get,
    path = "/api/mood/test",
    tag = "Mood",
    security(("bearer" = [])),
    responses((status = 200, body = MessageResponse))
)]
pub async fn greeting(ForwardedUser(user): ForwardedUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Mood service reached by user {}",
        user.subject
    )))
}

#[utoipa::path(
    get,
    path = "/api/mood",
    tag = "Mood",
    security(("bearer" = [])),
    responses((status = 200, description = "Caller's moods, newest first", body = [Mood]))
)]
pub async fn list_moods(
    State(state): State<AppState>,
    ForwardedUser(user): ForwardedUser,
) -> Json<Vec<Mood>> {
    Json(state.moods.read().await.list_for_user(&user.subject))
}

#[utoipa::path(
    post,
    path = "/api/mood",
    request_body = MoodRequest,
    tag = "Mood",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Mood),
        (status = 400, description = "Score outside 1-10")
    )
)]
pub async fn create_mood(
    State(state): State<AppState>,
    ForwardedUser(user): ForwardedUser,
    Json(request): Json<MoodRequest>,
) -> Result<(StatusCode, Json<Mood>), ApiError> {
    request.validate()?;
    let mood = state
        .moods
        .write()
        .await
        .create(&user.subject, request.score, request.note, Utc::now());
    Ok((StatusCode::CREATED, Json(mood)))
}

#[utoipa::path(
    put,
    path = "/api/mood/{id}",
    params(("id" = String, Path, description = "Mood entry identifier")),
    request_body = MoodRequest,
    tag = "Mood",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Mood),
        (status = 400, description = "Score outside 1-10"),
        (status = 403, description = "Entry belongs to another user"),
        (status = 404, description = "Unknown entry")
    )
)]
pub async fn update_mood(
    Path(id): Path<String>,
    State(state): State<AppState>,
    ForwardedUser(user): ForwardedUser,
    Json(request): Json<MoodRequest>,
) -> Result<Json<Mood>, ApiError> {
    request.validate()?;

    let mut moods = state.moods.write().await;
    let mood = moods.get(&id)?;
    ensure_can_modify(&mood, &user)?;
    Ok(Json(moods.update(&id, request.score, request.note)?))
}

#[utoipa::path(
    delete,
    path = "/api/mood/{id}",
    params(("id" = String, Path, description = "Mood entry identifier")),
    tag = "Mood",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Entry belongs to another user"),
        (status = 404, description = "Unknown entry")
    )
)]
pub async fn delete_mood(
    Path(id): Path<String>,
    State(state): State<AppState>,
    ForwardedUser(user): ForwardedUser,
) -> Result<StatusCode, ApiError> {
    let mut moods = state.moods.write().await;
    let mood = moods.get(&id)?;
    ensure_can_modify(&mood, &user)?;
    moods.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/mood/analytics",
    params(AnalyticsQuery),
    tag = "Mood",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MoodAnalytics),
        (status = 400, description = "Malformed range")
    )
)]
pub async fn analytics(
    State(state): State<AppState>,
    ForwardedUser(user): ForwardedUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<MoodAnalytics>, ApiError> {
    let since = query.since(Utc::now())?;
    Ok(Json(state.moods.read().await.analytics(&user.subject, since)))
}
