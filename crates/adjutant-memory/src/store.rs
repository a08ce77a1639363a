// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed fact store with merge-on-duplicate semantics.

use adjutant_core::error::AdjutantError;
use chrono::{SecondsFormat, Utc};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::types::{FactCandidate, FactCategory, FactSource, MemoryFact};

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

/// Persistent store for memory facts.
///
/// The duplicate key is `(user_id, content)` exact match. Merging never
/// lowers confidence and never rewrites content, category, source, or
/// extra_data; only a strictly higher confidence updates the row.
pub struct FactStore {
    conn: Connection,
}

impl FactStore {
    /// Creates a new FactStore wrapping an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create the fact table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), AdjutantError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS memory_facts (
                        id TEXT PRIMARY KEY NOT NULL,
                        user_id TEXT NOT NULL,
                        content TEXT NOT NULL,
                        category TEXT NOT NULL,
                        source TEXT NOT NULL,
                        confidence REAL NOT NULL
                            CHECK (confidence >= 0.0 AND confidence <= 1.0),
                        extra_data TEXT NOT NULL DEFAULT '{}',
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );

                    CREATE INDEX IF NOT EXISTS idx_memory_facts_user
                        ON memory_facts(user_id, updated_at);",
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        debug!("memory schema ready");
        Ok(())
    }

    /// Persist extracted candidates, merging duplicates.
    ///
    /// Returns the number of NEW rows only. For an existing `(user_id,
    /// content)` pair a strictly higher incoming confidence raises the
    /// stored confidence and bumps `updated_at`; everything else about the
    /// row is left untouched. Candidates without a confidence use
    /// `default_confidence`. All confidences are clamped into 0.0-1.0.
    pub async fn append_or_merge(
        &self,
        user_id: &str,
        candidates: Vec<FactCandidate>,
        default_confidence: f64,
    ) -> Result<usize, AdjutantError> {
        if candidates.is_empty() {
            return Ok(0);
        }

        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                let mut new_rows = 0usize;
                for candidate in candidates {
                    let confidence = candidate
                        .confidence
                        .unwrap_or(default_confidence)
                        .clamp(0.0, 1.0);

                    let existing = conn
                        .query_row(
                            "SELECT id, confidence FROM memory_facts WHERE user_id = ?1 AND content = ?2",
                            rusqlite::params![user_id, candidate.content],
                            |row| {
                                let id: String = row.get(0)?;
                                let confidence: f64 = row.get(1)?;
                                Ok((id, confidence))
                            },
                        )
                        .optional()?;

                    match existing {
                        Some((id, old_confidence)) => {
                            if confidence > old_confidence {
                                conn.execute(
                                    "UPDATE memory_facts SET confidence = ?1, updated_at = ?2 WHERE id = ?3",
                                    rusqlite::params![confidence, now_timestamp(), id],
                                )?;
                            }
                        }
                        None => {
                            let now = now_timestamp();
                            let extra_data = serde_json::to_string(&candidate.extra_data)
                                .unwrap_or_else(|_| "{}".to_string());
                            conn.execute(
                                "INSERT INTO memory_facts (id, user_id, content, category, source, confidence, extra_data, created_at, updated_at)
                                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                                rusqlite::params![
                                    Uuid::new_v4().to_string(),
                                    user_id,
                                    candidate.content,
                                    candidate.category.as_str(),
                                    candidate.source.as_str(),
                                    confidence,
                                    extra_data,
                                    now,
                                    now
                                ],
                            )?;
                            new_rows += 1;
                        }
                    }
                }
                Ok(new_rows)
            })
            .await
            .map_err(storage_err)
    }

    /// Fetch a user's facts ordered by confidence, then recency.
    ///
    /// This is the candidate order retrieval scoring starts from; ties in
    /// the final score preserve it.
    pub async fn scan(
        &self,
        user_id: &str,
        category: Option<FactCategory>,
        limit: usize,
    ) -> Result<Vec<MemoryFact>, AdjutantError> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                let facts = match category {
                    Some(category) => {
                        let mut stmt = conn.prepare(
                            "SELECT id, user_id, content, category, source, confidence, extra_data, created_at, updated_at
                             FROM memory_facts
                             WHERE user_id = ?1 AND category = ?2
                             ORDER BY confidence DESC, updated_at DESC
                             LIMIT ?3",
                        )?;
                        stmt.query_map(
                            rusqlite::params![user_id, category.as_str(), limit as i64],
                            |row| Ok(row_to_fact(row)),
                        )?
                        .collect::<Result<Vec<_>, _>>()?
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT id, user_id, content, category, source, confidence, extra_data, created_at, updated_at
                             FROM memory_facts
                             WHERE user_id = ?1
                             ORDER BY confidence DESC, updated_at DESC
                             LIMIT ?2",
                        )?;
                        stmt.query_map(rusqlite::params![user_id, limit as i64], |row| {
                            Ok(row_to_fact(row))
                        })?
                        .collect::<Result<Vec<_>, _>>()?
                    }
                };
                Ok(facts)
            })
            .await
            .map_err(storage_err)
    }

    /// All of a user's facts, most recently updated first.
    pub async fn list_all(&self, user_id: &str) -> Result<Vec<MemoryFact>, AdjutantError> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, content, category, source, confidence, extra_data, created_at, updated_at
                     FROM memory_facts
                     WHERE user_id = ?1
                     ORDER BY updated_at DESC",
                )?;
                let facts = stmt
                    .query_map(rusqlite::params![user_id], |row| Ok(row_to_fact(row)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(facts)
            })
            .await
            .map_err(storage_err)
    }

    /// Delete a fact, scoped to its owner. Returns whether a row matched.
    pub async fn delete(&self, user_id: &str, fact_id: &str) -> Result<bool, AdjutantError> {
        let user_id = user_id.to_string();
        let fact_id = fact_id.to_string();
        self.conn
            .call(move |conn| {
                let affected = conn.execute(
                    "DELETE FROM memory_facts WHERE user_id = ?1 AND id = ?2",
                    rusqlite::params![user_id, fact_id],
                )?;
                Ok(affected > 0)
            })
            .await
            .map_err(storage_err)
    }

    /// Update a fact's content and/or confidence, scoped to its owner.
    ///
    /// Sets only the provided fields plus `updated_at`. Returns whether a
    /// row matched.
    pub async fn update(
        &self,
        user_id: &str,
        fact_id: &str,
        content: Option<String>,
        confidence: Option<f64>,
    ) -> Result<bool, AdjutantError> {
        let user_id = user_id.to_string();
        let fact_id = fact_id.to_string();
        self.conn
            .call(move |conn| {
                let now = now_timestamp();
                let affected = match (content, confidence) {
                    (Some(content), Some(confidence)) => conn.execute(
                        "UPDATE memory_facts SET content = ?1, confidence = ?2, updated_at = ?3 WHERE user_id = ?4 AND id = ?5",
                        rusqlite::params![content, confidence.clamp(0.0, 1.0), now, user_id, fact_id],
                    )?,
                    (Some(content), None) => conn.execute(
                        "UPDATE memory_facts SET content = ?1, updated_at = ?2 WHERE user_id = ?3 AND id = ?4",
                        rusqlite::params![content, now, user_id, fact_id],
                    )?,
                    (None, Some(confidence)) => conn.execute(
                        "UPDATE memory_facts SET confidence = ?1, updated_at = ?2 WHERE user_id = ?3 AND id = ?4",
                        rusqlite::params![confidence.clamp(0.0, 1.0), now, user_id, fact_id],
                    )?,
                    (None, None) => conn.execute(
                        "UPDATE memory_facts SET updated_at = ?1 WHERE user_id = ?2 AND id = ?3",
                        rusqlite::params![now, user_id, fact_id],
                    )?,
                };
                Ok(affected > 0)
            })
            .await
            .map_err(storage_err)
    }
}

/// Convert a rusqlite Row to a MemoryFact struct.
fn row_to_fact(row: &rusqlite::Row) -> MemoryFact {
    let category_str: String = row.get(3).unwrap_or_default();
    let source_str: String = row.get(4).unwrap_or_default();
    let extra_data_str: String = row.get(6).unwrap_or_default();

    MemoryFact {
        id: row.get(0).unwrap_or_default(),
        user_id: row.get(1).unwrap_or_default(),
        content: row.get(2).unwrap_or_default(),
        category: FactCategory::from_str_value(&category_str),
        source: FactSource::from_str_value(&source_str),
        confidence: row.get(5).unwrap_or(0.5),
        extra_data: serde_json::from_str(&extra_data_str)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new())),
        created_at: row.get(7).unwrap_or_default(),
        updated_at: row.get(8).unwrap_or_default(),
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
