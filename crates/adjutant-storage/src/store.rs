// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed conversation store.

use adjutant_core::error::AdjutantError;
use adjutant_core::types::TurnRole;
use chrono::{SecondsFormat, Utc};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::types::{Conversation, ConversationSummary, Message};

/// Helper to convert tokio_rusqlite errors into AdjutantError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> AdjutantError {
    AdjutantError::Storage {
        source: Box::new(e),
    }
}

/// Current UTC time as an ISO 8601 string with millisecond precision.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persistent store for conversations and their messages.
pub struct ConversationStore {
    conn: Connection,
}

impl ConversationStore {
    /// Creates a new ConversationStore wrapping an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create the conversation tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), AdjutantError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS conversations (
                        id TEXT PRIMARY KEY NOT NULL,
                        user_id TEXT NOT NULL,
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );

                    CREATE TABLE IF NOT EXISTS messages (
                        id TEXT PRIMARY KEY NOT NULL,
                        conversation_id TEXT NOT NULL REFERENCES conversations(id),
                        role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
                        content TEXT NOT NULL,
                        created_at TEXT NOT NULL
                    );

                    CREATE INDEX IF NOT EXISTS idx_conversations_user
                        ON conversations(user_id, updated_at);
                    CREATE INDEX IF NOT EXISTS idx_messages_conversation
                        ON messages(conversation_id, created_at);",
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        debug!("conversation schema ready");
        Ok(())
    }

    /// Create a new conversation for a user.
    pub async fn create_conversation(
        &self,
        user_id: &str,
    ) -> Result<Conversation, AdjutantError> {
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now_timestamp(),
            updated_at: now_timestamp(),
        };
        let row = conversation.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO conversations (id, user_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![row.id, row.user_id, row.created_at, row.updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        Ok(conversation)
    }

    /// Get a conversation by id, scoped to its owner.
    pub async fn get_conversation(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, AdjutantError> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, created_at, updated_at FROM conversations WHERE id = ?1 AND user_id = ?2",
                )?;
                let conversation = stmt
                    .query_row(rusqlite::params![id, user_id], |row| {
                        Ok(row_to_conversation(row))
                    })
                    .optional()?;
                Ok(conversation)
            })
            .await
            .map_err(storage_err)
    }

    /// List a user's conversations with message counts, most recent first.
    pub async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, AdjutantError> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT c.id, c.created_at, c.updated_at,
                            (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = c.id)
                     FROM conversations c
                     WHERE c.user_id = ?1
                     ORDER BY c.updated_at DESC",
                )?;
                let summaries = stmt
                    .query_map(rusqlite::params![user_id], |row| {
                        Ok(ConversationSummary {
                            id: row.get(0)?,
                            created_at: row.get(1)?,
                            updated_at: row.get(2)?,
                            message_count: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(summaries)
            })
            .await
            .map_err(storage_err)
    }

    /// Bump a conversation's `updated_at` to now.
    pub async fn touch_conversation(&self, id: &str) -> Result<(), AdjutantError> {
        let id = id.to_string();
        let updated_at = now_timestamp();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                    rusqlite::params![updated_at, id],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Append a message to a conversation.
    pub async fn append_message(
        &self,
        conversation_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<Message, AdjutantError> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            role,
            content: content.to_string(),
            created_at: now_timestamp(),
        };
        let row = message.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO messages (id, conversation_id, role, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        row.id,
                        row.conversation_id,
                        row.role.as_str(),
                        row.content,
                        row.created_at
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        Ok(message)
    }

    /// All messages of a conversation in insertion order.
    pub async fn history(&self, conversation_id: &str) -> Result<Vec<Message>, AdjutantError> {
        let conversation_id = conversation_id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, conversation_id, role, content, created_at
                     FROM messages
                     WHERE conversation_id = ?1
                     ORDER BY created_at ASC, rowid ASC",
                )?;
                let messages = stmt
                    .query_map(rusqlite::params![conversation_id], |row| {
                        Ok(row_to_message(row))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(messages)
            })
            .await
            .map_err(storage_err)
    }
}

/// Convert a rusqlite Row to a Conversation struct.
fn row_to_conversation(row: &rusqlite::Row) -> Conversation {
    Conversation {
        id: row.get(0).unwrap_or_default(),
        user_id: row.get(1).unwrap_or_default(),
        created_at: row.get(2).unwrap_or_default(),
        updated_at: row.get(3).unwrap_or_default(),
    }
}

/// Convert a rusqlite Row to a Message struct.
fn row_to_message(row: &rusqlite::Row) -> Message {
    let role_str: String = row.get(2).unwrap_or_default();
    Message {
        id: row.get(0).unwrap_or_default(),
        conversation_id: row.get(1).unwrap_or_default(),
        role: TurnRole::from_str_value(&role_str),
        content: row.get(3).unwrap_or_default(),
        created_at: row.get(4).unwrap_or_default(),
    }
}

/// Extension trait for optional row queries.
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
