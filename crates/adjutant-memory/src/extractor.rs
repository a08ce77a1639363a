// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based fact extraction from chat turns and fetched emails.
//!
//! Matching is case-insensitive (patterns run against the lowered text) but
//! the stored fact content is always the original, non-lowered text. Several
//! patterns may fire on one turn; the store deduplicates on exact content.

use adjutant_core::error::AdjutantError;
use regex::Regex;
use serde_json::{Value, json};

use crate::types::{FactCandidate, FactCategory, FactSource};

/// Chat patterns with their categories. Matched turns become facts carrying
/// the whole turn text, at [`CHAT_CONFIDENCE`].
const CHAT_PATTERNS: &[(&str, FactCategory)] = &[
    (r"i (?:hate|don't like|dislike|avoid) (.+)", FactCategory::Preference),
    (r"i (?:love|like|prefer|enjoy) (.+)", FactCategory::Preference),
    (r"i never (.+)", FactCategory::Preference),
    (r"i always (.+)", FactCategory::Preference),
    (r"don't schedule (.+)", FactCategory::Schedule),
    (r"(?:my name is|i'm|i am) (\w+)", FactCategory::Fact),
    (r"(?:call me|address me as) (\w+)", FactCategory::Preference),
];

/// Project status patterns. All matches are project facts at
/// [`PROJECT_CONFIDENCE`].
const PROJECT_PATTERNS: &[&str] = &[
    r"(?:project|task) (\w+) (?:is|was|has been) (delayed|cancelled|completed|on track)",
    r"(\w+) project (?:is|was) (.*)",
    r"deadline for (.+) (?:is|was|has been) (?:extended|moved|changed)",
];

/// Confidence for facts matched by a chat pattern.
const CHAT_CONFIDENCE: f64 = 0.9;

/// Confidence for facts matched by a project pattern.
const PROJECT_CONFIDENCE: f64 = 0.85;

/// Status keywords scanned in fetched emails, in priority order. The first
/// keyword found in the subject or preview ends the scan for that email.
const EMAIL_STATUS_KEYWORDS: &[&str] =
    &["delayed", "completed", "cancelled", "on hold", "urgent", "deadline"];

/// Confidence for project facts derived from email status keywords.
const EMAIL_STATUS_CONFIDENCE: f64 = 0.8;

/// Confidence for contact facts derived from urgent or important emails.
const URGENT_EMAIL_CONFIDENCE: f64 = 0.75;

/// Extracts fact candidates from conversation turns and email records.
pub struct MemoryExtractor {
    chat_patterns: Vec<(Regex, FactCategory)>,
    project_patterns: Vec<Regex>,
}

impl MemoryExtractor {
    /// Compiles the pattern tables once.
    pub fn new() -> Result<Self, AdjutantError> {
        let chat_patterns = CHAT_PATTERNS
            .iter()
            .map(|(pattern, category)| {
                Regex::new(pattern)
                    .map(|regex| (regex, *category))
                    .map_err(|e| AdjutantError::Internal(format!("bad chat pattern: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let project_patterns = PROJECT_PATTERNS
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|e| AdjutantError::Internal(format!("bad project pattern: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            chat_patterns,
            project_patterns,
        })
    }

    /// Extract fact candidates from one user turn.
    ///
    /// Every matching pattern contributes a candidate; the candidates carry
    /// the original turn text, so duplicates collapse at the store.
    pub fn extract_from_turn(&self, turn: &str) -> Vec<FactCandidate> {
        let lowered = turn.to_lowercase();
        let mut candidates = Vec::new();

        for (regex, category) in &self.chat_patterns {
            if regex.is_match(&lowered) {
                candidates.push(FactCandidate::new(
                    turn,
                    *category,
                    FactSource::Chat,
                    CHAT_CONFIDENCE,
                ));
            }
        }

        for regex in &self.project_patterns {
            if regex.is_match(&lowered) {
                candidates.push(FactCandidate::new(
                    turn,
                    FactCategory::Project,
                    FactSource::Chat,
                    PROJECT_CONFIDENCE,
                ));
            }
        }

        candidates
    }

    /// Extract fact candidates from fetched email records.
    ///
    /// Each record may produce a project fact (first status keyword found in
    /// subject or preview) and, independently, a contact fact when the email
    /// is flagged urgent or important. Degraded records are skipped.
    pub fn extract_from_emails(&self, records: &[Value]) -> Vec<FactCandidate> {
        let mut candidates = Vec::new();

        for record in records {
            if record.get("error").is_some() {
                continue;
            }
            let email_id = record.get("id").and_then(Value::as_str).unwrap_or("");
            let sender = record.get("from").and_then(Value::as_str).unwrap_or("Unknown");
            let subject = record.get("subject").and_then(Value::as_str).unwrap_or("");
            let preview = record
                .get("snippet")
                .or_else(|| record.get("body"))
                .and_then(Value::as_str)
                .unwrap_or("");

            let subject_lower = subject.to_lowercase();
            let preview_lower = preview.to_lowercase();

            for keyword in EMAIL_STATUS_KEYWORDS {
                if subject_lower.contains(keyword) || preview_lower.contains(keyword) {
                    candidates.push(FactCandidate {
                        content: format!("Email from {sender}: {subject} - Status: {keyword}"),
                        category: FactCategory::Project,
                        source: FactSource::Email,
                        confidence: Some(EMAIL_STATUS_CONFIDENCE),
                        extra_data: json!({
                            "email_id": email_id,
                            "sender": sender,
                            "keyword": keyword,
                        }),
                    });
                    break;
                }
            }

            if subject_lower.contains("urgent")
                || subject_lower.contains("important")
                || preview_lower.contains("asap")
            {
                candidates.push(FactCandidate {
                    content: format!("{sender} sent urgent/important email: {subject}"),
                    category: FactCategory::Contact,
                    source: FactSource::Email,
                    confidence: Some(URGENT_EMAIL_CONFIDENCE),
                    extra_data: json!({
                        "sender": sender,
                        "email_id": email_id,
                    }),
                });
            }
        }

        candidates
    }
}
