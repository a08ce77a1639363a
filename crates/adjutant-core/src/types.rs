// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Adjutant workspace.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The human owner of the agent.
    User,
    /// The agent itself.
    Assistant,
}

impl TurnRole {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "assistant" => TurnRole::Assistant,
            _ => TurnRole::User,
        }
    }
}

/// A single turn of the persisted conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub role: TurnRole,
    /// Turn text, stored verbatim.
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        ConversationTurn {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ConversationTurn {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a turn as seen by the language model API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    /// Human-authored turn.
    User,
    /// Model-authored turn.
    Model,
}

impl ModelRole {
    /// Wire name used by the model API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::User => "user",
            ModelRole::Model => "model",
        }
    }
}

/// One entry of the ordered transcript sent to the language model.
#[derive(Debug, Clone)]
pub struct ModelTurn {
    pub role: ModelRole,
    pub text: String,
}

impl ModelTurn {
    pub fn user(text: impl Into<String>) -> Self {
        ModelTurn {
            role: ModelRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        ModelTurn {
            role: ModelRole::Model,
            text: text.into(),
        }
    }
}

/// The common result contract every capability action produces.
///
/// List-shaped actions (inbox fetch, upcoming events) return [`ToolPayload::Items`];
/// single-object actions (availability, send receipt) return [`ToolPayload::Record`].
/// Degraded results reuse the same shapes with an `error` key so downstream
/// formatting never needs a third case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolPayload {
    /// An ordered list of JSON records.
    Items(Vec<Value>),
    /// A single JSON record.
    Record(Value),
}

impl ToolPayload {
    /// Degraded list payload carrying an error marker as its only item.
    pub fn error_items(message: impl Into<String>) -> Self {
        ToolPayload::Items(vec![json!({ "error": message.into() })])
    }

    /// Degraded record payload carrying an error marker.
    pub fn error_record(message: impl Into<String>) -> Self {
        ToolPayload::Record(json!({ "error": message.into() }))
    }

    /// The error message when this payload is degraded, else `None`.
    ///
    /// A list is degraded when its first item carries an `error` key; a
    /// record is degraded when it carries one itself.
    pub fn error_message(&self) -> Option<&str> {
        let record = match self {
            ToolPayload::Items(items) => items.first()?,
            ToolPayload::Record(value) => value,
        };
        record.get("error").and_then(Value::as_str)
    }
}

/// What the tool-execution stage hands to response synthesis.
#[derive(Debug, Clone)]
pub struct ToolReport {
    /// Capability that was invoked (e.g. `mail`, `calendar`).
    pub capability: String,
    /// Action name within the capability.
    pub action: String,
    /// Result payload, possibly degraded.
    pub payload: ToolPayload,
}

/// Per-invocation context passed to capability adapters.
#[derive(Debug, Clone)]
pub struct CapabilityContext {
    /// The principal the call is scoped to.
    pub user_id: String,
}

impl CapabilityContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        CapabilityContext {
            user_id: user_id.into(),
        }
    }
}
