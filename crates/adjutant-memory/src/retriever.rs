// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical retrieval over the fact store.
//!
//! Candidates are fetched in confidence-then-recency order, scored by token
//! overlap with the context plus a category bonus when the context topic
//! matches, filtered, and stably re-sorted by confidence plus relevance.

use std::collections::HashSet;
use std::sync::Arc;

use adjutant_config::model::MemoryConfig;
use adjutant_core::error::AdjutantError;

use crate::store::FactStore;
use crate::types::{FactCategory, MemoryFact};

/// Categories boosted when the context mentions meetings or scheduling.
const SCHEDULE_TOPIC_CATEGORIES: &[FactCategory] =
    &[FactCategory::Schedule, FactCategory::Preference];

/// Categories boosted when the context mentions email.
const EMAIL_TOPIC_CATEGORIES: &[FactCategory] =
    &[FactCategory::Project, FactCategory::Contact];

/// Retrieval engine combining the fact store with configured scoring.
pub struct RetrievalEngine {
    store: Arc<FactStore>,
    config: MemoryConfig,
}

impl RetrievalEngine {
    /// Creates a new retrieval engine.
    pub fn new(store: Arc<FactStore>, config: MemoryConfig) -> Self {
        Self { store, config }
    }

    /// Retrieve the facts most relevant to `context` for a user.
    ///
    /// 1. Fetches up to `limit` candidates ordered by confidence, then recency
    /// 2. Scores each by token overlap and category bonus
    /// 3. Keeps facts with any relevance, or confidence above the floor
    /// 4. Stable-sorts by confidence + relevance, truncates to `limit`
    pub async fn retrieve(
        &self,
        user_id: &str,
        context: &str,
        limit: usize,
    ) -> Result<Vec<MemoryFact>, AdjutantError> {
        let candidates = self.store.scan(user_id, None, limit).await?;
        Ok(select_relevant(candidates, context, &self.config, limit))
    }
}

/// Relevance of one fact to a lowered context string.
///
/// Token overlap counts distinct whitespace-separated words shared by the
/// lowered context and the lowered fact content, each worth
/// `token_overlap_weight`. The category bonus applies when the context
/// mentions a topic the fact's category serves. Confidence is not part of
/// the relevance; the caller combines them.
pub fn score_fact(fact: &MemoryFact, context_lower: &str, tuning: &MemoryConfig) -> f64 {
    let context_words: HashSet<&str> = context_lower.split_whitespace().collect();
    let content_lower = fact.content.to_lowercase();
    let content_words: HashSet<&str> = content_lower.split_whitespace().collect();
    let overlap = context_words.intersection(&content_words).count();

    let mut relevance = overlap as f64 * tuning.token_overlap_weight;

    if (context_lower.contains("meeting") || context_lower.contains("schedule"))
        && SCHEDULE_TOPIC_CATEGORIES.contains(&fact.category)
    {
        relevance += tuning.category_bonus;
    }

    if (context_lower.contains("email") || context_lower.contains("mail"))
        && EMAIL_TOPIC_CATEGORIES.contains(&fact.category)
    {
        relevance += tuning.category_bonus;
    }

    relevance
}

/// Score, filter, and order candidate facts for a context.
///
/// A fact survives when it has any relevance, or when its confidence exceeds
/// the configured floor. The sort on confidence + relevance is stable, so
/// ties keep the candidate order (confidence desc, then recency).
pub fn select_relevant(
    candidates: Vec<MemoryFact>,
    context: &str,
    tuning: &MemoryConfig,
    limit: usize,
) -> Vec<MemoryFact> {
    let context_lower = context.to_lowercase();

    let mut scored: Vec<(f64, MemoryFact)> = candidates
        .into_iter()
        .filter_map(|fact| {
            let relevance = score_fact(&fact, &context_lower, tuning);
            if relevance > 0.0 || fact.confidence > tuning.confidence_floor {
                Some((fact.confidence + relevance, fact))
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, fact)| fact).collect()
}
