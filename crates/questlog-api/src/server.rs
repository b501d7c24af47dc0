// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use questlog_config::model::ApiConfig;
use questlog_core::QuestlogError;
use questlog_journal::{Dispatcher, JournalService};
use questlog_progression::{ProgressionEngine, QuestEngine};

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub characters: ProgressionEngine,
    pub quests: QuestEngine,
    pub journal: JournalService,
    /// Read for queue counters on `/health`.
    pub dispatcher: Arc<Dispatcher>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

/// Build the full router. `/health` is public; everything under `/v1`
/// goes through [`auth_middleware`].
pub fn build_router(state: AppState, auth: AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/characters", post(handlers::create_character))
        .route("/v1/characters/{id}", get(handlers::get_character))
        .route(
            "/v1/characters/user/{user_id}",
            get(handlers::get_character_by_user),
        )
        .route("/v1/characters/{id}/xp", post(handlers::grant_xp))
        .route(
            "/v1/characters/user/{user_id}/xp",
            post(handlers::grant_xp_to_user),
        )
        .route(
            "/v1/characters/{id}/spend-points",
            post(handlers::spend_attribute_points),
        )
        .route("/v1/quests", post(handlers::create_quest))
        .route("/v1/quests/user/{user_id}", get(handlers::get_user_quests))
        .route("/v1/quests/{id}", put(handlers::update_quest))
        .route("/v1/quests/{id}/complete", post(handlers::complete_quest))
        .route(
            "/v1/entries/{id}",
            get(handlers::get_entry).put(handlers::update_entry),
        )
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind to the configured host:port and serve until `shutdown` fires.
///
/// Refuses to start when no bearer token is configured.
pub async fn start_server(
    config: &ApiConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), QuestlogError> {
    let Some(token) = config.bearer_token.clone() else {
        return Err(QuestlogError::Config(
            "api.bearer_token must be set to serve the API".to_string(),
        ));
    };
    let router = build_router(
        state,
        AuthConfig {
            bearer_token: Some(token),
        },
    );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| QuestlogError::Internal(format!("failed to bind api to {addr}: {e}")))?;

    serve(listener, router, shutdown).await
}

/// Serve `router` on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), QuestlogError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "api server listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| QuestlogError::Internal(format!("api server error: {e}")))?;

    tracing::info!("api server stopped");
    Ok(())
}
