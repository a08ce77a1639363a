// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types for the long-term fact store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single fact the agent remembers about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFact {
    /// Unique identifier for this fact.
    pub id: String,
    /// The principal this fact belongs to.
    pub user_id: String,
    /// The fact text, stored exactly as observed (original casing).
    pub content: String,
    /// What kind of fact this is.
    pub category: FactCategory,
    /// Where the fact came from.
    pub source: FactSource,
    /// Confidence score (0.0-1.0).
    pub confidence: f64,
    /// Structured context captured alongside the fact (JSON object).
    pub extra_data: Value,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp. Bumped when a merge raises confidence.
    pub updated_at: String,
}

/// What kind of fact a memory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactCategory {
    /// Likes, dislikes, and standing requests.
    Preference,
    /// Project and task status.
    Project,
    /// People the user corresponds with.
    Contact,
    /// Communication style.
    Style,
    /// General facts (names, roles).
    Fact,
    /// Open tasks.
    Task,
    /// Scheduling constraints.
    Schedule,
}

impl FactCategory {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactCategory::Preference => "preference",
            FactCategory::Project => "project",
            FactCategory::Contact => "contact",
            FactCategory::Style => "style",
            FactCategory::Fact => "fact",
            FactCategory::Task => "task",
            FactCategory::Schedule => "schedule",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "preference" => FactCategory::Preference,
            "project" => FactCategory::Project,
            "contact" => FactCategory::Contact,
            "style" => FactCategory::Style,
            "task" => FactCategory::Task,
            "schedule" => FactCategory::Schedule,
            _ => FactCategory::Fact,
        }
    }
}

/// Where a fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    /// Extracted from a chat turn.
    Chat,
    /// Extracted from a fetched email.
    Email,
    /// Extracted from a calendar event.
    Calendar,
    /// User explicitly asked the agent to remember it.
    Explicit,
}

impl FactSource {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactSource::Chat => "chat",
            FactSource::Email => "email",
            FactSource::Calendar => "calendar",
            FactSource::Explicit => "explicit",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "email" => FactSource::Email,
            "calendar" => FactSource::Calendar,
            "explicit" => FactSource::Explicit,
            _ => FactSource::Chat,
        }
    }
}

/// A fact produced by extraction, not yet persisted.
///
/// `confidence` of `None` means "use the configured default". The store
/// clamps every confidence into 0.0-1.0 at write time.
#[derive(Debug, Clone)]
pub struct FactCandidate {
    pub content: String,
    pub category: FactCategory,
    pub source: FactSource,
    pub confidence: Option<f64>,
    pub extra_data: Value,
}

impl FactCandidate {
    /// A candidate with no structured context.
    pub fn new(
        content: impl Into<String>,
        category: FactCategory,
        source: FactSource,
        confidence: f64,
    ) -> Self {
        FactCandidate {
            content: content.into(),
            category,
            source,
            confidence: Some(confidence),
            extra_data: Value::Object(serde_json::Map::new()),
        }
    }
}
