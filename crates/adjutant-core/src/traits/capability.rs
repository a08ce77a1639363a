// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability adapter trait for integrations the agent can act through
//! (mail, calendar).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AdjutantError;
use crate::types::{CapabilityContext, ToolPayload};

/// A named integration exposing a registry of invocable actions.
///
/// Every action returns the common [`ToolPayload`] contract. Adapters must
/// answer an unknown action name with [`AdjutantError::ToolNotFound`] rather
/// than panicking or inventing behavior.
#[async_trait]
pub trait CapabilityAdapter: Send + Sync {
    /// Registry name of this capability (e.g. `mail`, `calendar`).
    fn name(&self) -> &str;

    /// Invokes one action by name with JSON parameters.
    async fn invoke(
        &self,
        action: &str,
        params: &Value,
        ctx: &CapabilityContext,
    ) -> Result<ToolPayload, AdjutantError>;
}
