// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model adapter for deterministic pipeline testing.
//!
//! Scripted replies are handed out FIFO, and every call is recorded so tests
//! can assert exactly what grounding and transcript the pipeline sent. An
//! empty queue yields an error, which is how tests drive the degraded
//! response path without a network in sight.

use std::collections::VecDeque;
use std::sync::Arc;

use adjutant_core::error::AdjutantError;
use adjutant_core::traits::ModelAdapter;
use adjutant_core::types::ModelTurn;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// One recorded `generate` call: the grounding text and the turns, verbatim.
#[derive(Debug, Clone)]
pub struct RecordedGenerate {
    pub system: String,
    pub turns: Vec<ModelTurn>,
}

/// Deterministic [`ModelAdapter`] backed by a queue of scripted replies.
#[derive(Clone)]
pub struct MockModel {
    replies: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<RecordedGenerate>>>,
}

impl MockModel {
    /// Create a mock with no scripted replies. Every call fails, which
    /// exercises the caller's degraded path.
    pub fn new() -> Self {
        MockModel {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that answers with the given replies in order.
    pub fn with_replies(replies: Vec<String>) -> Self {
        MockModel {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one more reply behind any already scripted.
    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().await.push_back(reply.into());
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedGenerate> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelAdapter for MockModel {
    async fn generate(
        &self,
        system: &str,
        turns: &[ModelTurn],
    ) -> Result<String, AdjutantError> {
        self.calls.lock().await.push(RecordedGenerate {
            system: system.to_string(),
            turns: turns.to_vec(),
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AdjutantError::model("mock model has no scripted reply"))
    }
}
