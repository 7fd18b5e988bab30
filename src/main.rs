// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

use std::net::SocketAddr;
use std::time::Duration;

use axum_server::Handle;
use mindwell_server::{accounts, api::router, config::Settings, logging, state::AppState};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let settings = Settings::from_env().expect("Invalid configuration");
    logging::init(settings.log_format).expect("Failed to initialize logging");

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("Failed to parse bind address");

    let state = AppState::new(settings);

    if let Some(seed) = &state.settings.seed_admin {
        if let Err(e) = accounts::seed_admin(&state, seed).await {
            panic!("Failed to seed admin account: {}", e.message);
        }
    }

    let app = router(state);

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, draining connections");
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    tracing::info!(%addr, "MindWell server listening (docs at /docs)");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");

    tracing::info!("Server stopped");
}
