// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{edge_auth, IssuedToken, Role},
    models::{
        LoginRequest, LoginResponse, MessageResponse, MoodRequest, RegisterRequest,
        UpdateUserRequest, UserProfile,
    },
    state::AppState,
    store::{Mood, MoodAnalytics},
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod mood;

/// Build the full application: routes, edge filter and HTTP middleware.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/users", get(auth::list_users))
        .route(
            "/api/auth/users/{id}",
            put(auth::update_user).delete(auth::delete_user),
        )
        .route(
            "/api/mood",
            get(mood::list_moods).post(mood::create_mood),
        )
        .route("/api/mood/test", get(mood::greeting))
        .route("/api/mood/analytics", get(mood::analytics))
        .route(
            "/api/mood/{id}",
            put(mood::update_mood).delete(mood::delete_mood),
        )
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), edge_auth))
        .with_state(state);

    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive()),
    )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::me,
        auth::list_users,
        auth::update_user,
        auth::delete_user,
        mood::greeting,
        mood::list_moods,
        mood::create_mood,
        mood::update_mood,
        mood::delete_mood,
        mood::analytics,
        admin::dashboard,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Role,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            IssuedToken,
            UserProfile,
            UpdateUserRequest,
            Mood,
            MoodRequest,
            MoodAnalytics,
            MessageResponse,
            admin::DashboardResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and account management"),
        (name = "Mood", description = "Mood tracking"),
        (name = "Admin", description = "Administrative operations"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
