// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model adapter trait for language model integrations.

use async_trait::async_trait;

use crate::error::AdjutantError;
use crate::types::ModelTurn;

/// Adapter for language model APIs.
///
/// The grounding context travels separately from the conversation turns so
/// adapters can use their provider's native system field. Turns are ordered:
/// history first, current user turn last.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Generates a single completion for the grounding and transcript.
    async fn generate(&self, system: &str, turns: &[ModelTurn])
        -> Result<String, AdjutantError>;
}
