// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use adjutant_agent::Orchestrator;
use adjutant_core::CapabilityAdapter;
use adjutant_core::error::AdjutantError;
use adjutant_memory::FactStore;
use adjutant_storage::ConversationStore;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The message pipeline behind POST /api/chat/message.
    pub orchestrator: Arc<Orchestrator>,
    /// Conversation and message persistence.
    pub conversations: Arc<ConversationStore>,
    /// Long-term memory persistence, for the memory endpoints.
    pub facts: Arc<FactStore>,
    /// Capability registry for the direct gmail/calendar passthroughs.
    pub capabilities: Arc<HashMap<String, Arc<dyn CapabilityAdapter>>>,
    /// The single principal every request is scoped to.
    pub owner_user_id: String,
    /// Service name reported by the health endpoint.
    pub service_name: String,
    /// Authentication configuration.
    pub auth: AuthConfig,
}

/// Gateway server configuration (mirrors GatewayConfig from adjutant-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for auth (None = all API requests rejected).
    pub auth_token: Option<String>,
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves:
/// - GET /api/health (public)
/// - POST /api/chat/message
/// - GET /api/chat/history/{conversation_id}
/// - GET /api/chat/conversations
/// - GET /api/chat/memory, DELETE /api/chat/memory/{memory_id}
/// - GET /api/chat/gmail/emails, GET /api/chat/gmail/important
/// - GET /api/chat/calendar/events, GET /api/chat/calendar/today
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AdjutantError> {
    let auth_state = state.auth.clone();

    // Unauthenticated health check for process supervisors.
    let public_routes = Router::new()
        .route("/api/health", get(handlers::get_health))
        .with_state(state.clone());

    // Everything else requires the bearer token.
    let api_routes = Router::new()
        .route("/api/chat/message", post(handlers::post_chat_message))
        .route(
            "/api/chat/history/{conversation_id}",
            get(handlers::get_history),
        )
        .route("/api/chat/conversations", get(handlers::list_conversations))
        .route("/api/chat/memory", get(handlers::get_memories))
        .route(
            "/api/chat/memory/{memory_id}",
            delete(handlers::delete_memory),
        )
        .route("/api/chat/gmail/emails", get(handlers::get_gmail_emails))
        .route(
            "/api/chat/gmail/important",
            get(handlers::get_important_emails),
        )
        .route(
            "/api/chat/calendar/events",
            get(handlers::get_calendar_events),
        )
        .route(
            "/api/chat/calendar/today",
            get(handlers::get_today_schedule),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AdjutantError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AdjutantError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
