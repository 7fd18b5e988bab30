// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Admin-only endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{auth::AdminOnly, state::AppState};

/// Greeting plus account counts for the admin landing page.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub message: String,
    pub total_users: usize,
    /// Accounts holding `ADMIN`
    pub admin_count: usize,
}

/// Confirms the caller holds `ADMIN` and summarizes the account base.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DashboardResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "ADMIN role required")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
) -> Json<DashboardResponse> {
    tracing::debug!(subject = %admin.subject, "Admin dashboard accessed");
    let users = state.users.read().await;
    Json(DashboardResponse {
        message: format!("Welcome to the admin dashboard, {}", admin.subject),
        total_users: users.len(),
        admin_count: users.find_admins().len(),
    })
}
