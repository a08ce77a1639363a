// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Chat endpoints drive the orchestrator and persist the conversation;
//! memory endpoints expose the fact store; the gmail/calendar endpoints are
//! thin passthroughs over the capability registry. Internal errors never
//! leak details to the client, only a stable error string.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use adjutant_core::error::AdjutantError;
use adjutant_core::types::{CapabilityContext, ConversationTurn, ToolPayload, TurnRole};
use adjutant_memory::MemoryFact;

use crate::server::GatewayState;

/// Request body for POST /api/chat/message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Message text from the user.
    pub message: String,
    /// Conversation to continue; a new one is created when absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response body for POST /api/chat/message.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub response: String,
    /// Conversation the exchange belongs to (possibly newly created).
    pub conversation_id: String,
    /// Id of the persisted assistant message.
    pub message_id: String,
}

/// One message in a conversation history response.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// Response body for GET /api/chat/history/{conversation_id}.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub conversation_id: String,
    pub messages: Vec<MessageView>,
}

/// Response body for GET /api/chat/conversations.
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<adjutant_storage::ConversationSummary>,
}

/// Response body for GET /api/chat/memory.
#[derive(Debug, Serialize)]
pub struct MemoryListResponse {
    pub memories: Vec<MemoryFact>,
    pub count: usize,
}

/// Response body for DELETE /api/chat/memory/{memory_id}.
#[derive(Debug, Serialize)]
pub struct DeleteMemoryResponse {
    pub success: bool,
    pub message: String,
}

/// Response body for the gmail passthrough endpoints.
#[derive(Debug, Serialize)]
pub struct EmailListResponse {
    pub emails: Vec<Value>,
    pub count: usize,
}

/// Response body for the calendar passthrough endpoints.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Value>,
    pub count: usize,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Query parameters for GET /api/chat/gmail/emails.
#[derive(Debug, Deserialize)]
pub struct EmailListParams {
    #[serde(default)]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub query: Option<String>,
}

/// Query parameters for the endpoints taking a day window.
#[derive(Debug, Deserialize)]
pub struct DayWindowParams {
    #[serde(default)]
    pub days: Option<i64>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /api/health
///
/// Unauthenticated liveness check.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        service: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/chat/message
///
/// Accepts a message, runs it through the pipeline, persists both sides of
/// the exchange, and returns the reply.
pub async fn post_chat_message(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let user_id = state.owner_user_id.clone();

    // Resolve or create the conversation.
    let conversation = match &body.conversation_id {
        Some(id) => match state.conversations.get_conversation(id, &user_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                return error_response(StatusCode::NOT_FOUND, "Conversation not found");
            }
            Err(e) => {
                error!(error = %e, "failed to load conversation");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process message",
                );
            }
        },
        None => match state.conversations.create_conversation(&user_id).await {
            Ok(conversation) => {
                info!(
                    conversation_id = conversation.id.as_str(),
                    "created new conversation"
                );
                conversation
            }
            Err(e) => {
                error!(error = %e, "failed to create conversation");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process message",
                );
            }
        },
    };

    // Persist the user message, then load the history preceding it.
    if let Err(e) = state
        .conversations
        .append_message(&conversation.id, TurnRole::User, &body.message)
        .await
    {
        error!(error = %e, "failed to persist user message");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process message");
    }

    let history = match state.conversations.history(&conversation.id).await {
        Ok(messages) => messages,
        Err(e) => {
            error!(error = %e, "failed to load history");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process message",
            );
        }
    };
    // The just-appended user message is the last row; the pipeline receives
    // everything before it plus the raw message text.
    let prior_turns: Vec<ConversationTurn> = history
        .iter()
        .take(history.len().saturating_sub(1))
        .map(|message| ConversationTurn {
            role: message.role,
            content: message.content.clone(),
        })
        .collect();

    let response_text = state
        .orchestrator
        .handle_message(&user_id, &body.message, &prior_turns)
        .await;

    let assistant_message = match state
        .conversations
        .append_message(&conversation.id, TurnRole::Assistant, &response_text)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            error!(error = %e, "failed to persist assistant message");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process message",
            );
        }
    };

    if let Err(e) = state.conversations.touch_conversation(&conversation.id).await {
        error!(error = %e, "failed to touch conversation");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process message");
    }

    info!(
        conversation_id = conversation.id.as_str(),
        "message processed"
    );

    (
        StatusCode::OK,
        Json(ChatResponse {
            response: response_text,
            conversation_id: conversation.id,
            message_id: assistant_message.id,
        }),
    )
        .into_response()
}

/// GET /api/chat/history/{conversation_id}
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Response {
    match state
        .conversations
        .get_conversation(&conversation_id, &state.owner_user_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Conversation not found"),
        Err(e) => {
            error!(error = %e, "failed to load conversation");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve conversation history",
            );
        }
    }

    match state.conversations.history(&conversation_id).await {
        Ok(messages) => {
            let messages = messages
                .into_iter()
                .map(|message| MessageView {
                    id: message.id,
                    role: message.role.as_str().to_string(),
                    content: message.content,
                    created_at: message.created_at,
                })
                .collect();
            (
                StatusCode::OK,
                Json(HistoryResponse {
                    conversation_id,
                    messages,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to load history");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve conversation history",
            )
        }
    }
}

/// GET /api/chat/conversations
pub async fn list_conversations(State(state): State<GatewayState>) -> Response {
    match state
        .conversations
        .list_conversations(&state.owner_user_id)
        .await
    {
        Ok(conversations) => {
            (StatusCode::OK, Json(ConversationListResponse { conversations }))
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list conversations");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list conversations",
            )
        }
    }
}

/// GET /api/chat/memory
pub async fn get_memories(State(state): State<GatewayState>) -> Response {
    match state.facts.list_all(&state.owner_user_id).await {
        Ok(memories) => {
            let count = memories.len();
            (StatusCode::OK, Json(MemoryListResponse { memories, count })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list memories");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch memories")
        }
    }
}

/// DELETE /api/chat/memory/{memory_id}
pub async fn delete_memory(
    State(state): State<GatewayState>,
    Path(memory_id): Path<String>,
) -> Response {
    match state.facts.delete(&state.owner_user_id, &memory_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(DeleteMemoryResponse {
                success: true,
                message: "Memory deleted".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Memory not found"),
        Err(e) => {
            error!(error = %e, "failed to delete memory");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete memory")
        }
    }
}

/// GET /api/chat/gmail/emails
pub async fn get_gmail_emails(
    State(state): State<GatewayState>,
    Query(params): Query<EmailListParams>,
) -> Response {
    let mut args = serde_json::Map::new();
    if let Some(max_results) = params.max_results {
        args.insert("max_results".to_string(), max_results.into());
    }
    if let Some(query) = params.query {
        args.insert("query".to_string(), query.into());
    }

    match invoke_list_action(&state, "mail", "fetch_emails", Value::Object(args)).await {
        Ok(emails) => {
            let count = emails.len();
            (StatusCode::OK, Json(EmailListResponse { emails, count })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to fetch emails");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch emails")
        }
    }
}

/// GET /api/chat/gmail/important
pub async fn get_important_emails(
    State(state): State<GatewayState>,
    Query(params): Query<DayWindowParams>,
) -> Response {
    let mut args = serde_json::Map::new();
    if let Some(days) = params.days {
        args.insert("days".to_string(), days.into());
    }

    match invoke_list_action(&state, "mail", "get_important_emails", Value::Object(args)).await {
        Ok(emails) => {
            let count = emails.len();
            (StatusCode::OK, Json(EmailListResponse { emails, count })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to fetch important emails");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch important emails",
            )
        }
    }
}

/// GET /api/chat/calendar/events
pub async fn get_calendar_events(
    State(state): State<GatewayState>,
    Query(params): Query<DayWindowParams>,
) -> Response {
    let mut args = serde_json::Map::new();
    if let Some(days) = params.days {
        args.insert("days".to_string(), days.into());
    }

    match invoke_list_action(&state, "calendar", "get_upcoming_events", Value::Object(args)).await
    {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(EventListResponse { events, count })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to fetch calendar events");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch calendar events",
            )
        }
    }
}

/// GET /api/chat/calendar/today
pub async fn get_today_schedule(State(state): State<GatewayState>) -> Response {
    let args = Value::Object(serde_json::Map::new());

    match invoke_list_action(&state, "calendar", "get_today_schedule", args).await {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(EventListResponse { events, count })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to fetch today's schedule");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch today's schedule",
            )
        }
    }
}

/// Invoke a list-shaped capability action on behalf of the owner.
async fn invoke_list_action(
    state: &GatewayState,
    capability: &str,
    action: &str,
    params: Value,
) -> Result<Vec<Value>, AdjutantError> {
    let adapter = state.capabilities.get(capability).ok_or_else(|| {
        AdjutantError::ToolNotFound {
            capability: capability.to_string(),
            action: action.to_string(),
        }
    })?;
    let ctx = CapabilityContext::new(&state.owner_user_id);
    match adapter.invoke(action, &params, &ctx).await? {
        ToolPayload::Items(items) => Ok(items),
        ToolPayload::Record(_) => Err(AdjutantError::Internal(format!(
            "{capability}/{action} returned a record, expected a list"
        ))),
    }
}
