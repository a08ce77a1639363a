// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation domain types.

use adjutant_core::types::TurnRole;
use serde::{Deserialize, Serialize};

/// A conversation between the owner and the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// The principal this conversation belongs to.
    pub user_id: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-activity timestamp. Bumped on every appended message.
    pub updated_at: String,
}

/// A conversation with its message count, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: i64,
}

/// A single persisted message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Conversation this message belongs to.
    pub conversation_id: String,
    /// Who authored the message.
    pub role: TurnRole,
    /// Message text, stored verbatim.
    pub content: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_role_as_string() {
        let message = Message {
            id: "msg-1".to_string(),
            conversation_id: "conv-1".to_string(),
            role: TurnRole::Assistant,
            content: "hello".to_string(),
            created_at: "2026-03-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
