// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted capability adapter for exercising the tool stage.
//!
//! Results are dealt FIFO regardless of action, and every invocation is
//! recorded with its action and parameters. Tests script a success, an
//! error, or nothing at all (the queue then errors) and assert afterwards
//! on what the pipeline actually asked for.

use std::collections::VecDeque;
use std::sync::Arc;

use adjutant_core::error::AdjutantError;
use adjutant_core::traits::CapabilityAdapter;
use adjutant_core::types::{CapabilityContext, ToolPayload};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// One recorded `invoke` call.
#[derive(Debug, Clone)]
pub struct RecordedInvoke {
    pub action: String,
    pub params: Value,
    pub user_id: String,
}

/// Deterministic [`CapabilityAdapter`] backed by a queue of scripted results.
#[derive(Clone)]
pub struct ScriptedCapability {
    name: String,
    results: Arc<Mutex<VecDeque<Result<ToolPayload, AdjutantError>>>>,
    invocations: Arc<Mutex<Vec<RecordedInvoke>>>,
}

impl ScriptedCapability {
    /// Create a scripted capability with no queued results. Every invoke
    /// fails, which exercises the caller's degraded path.
    pub fn new(name: impl Into<String>) -> Self {
        ScriptedCapability {
            name: name.into(),
            results: Arc::new(Mutex::new(VecDeque::new())),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful payload.
    pub async fn push_payload(&self, payload: ToolPayload) {
        self.results.lock().await.push_back(Ok(payload));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: AdjutantError) {
        self.results.lock().await.push_back(Err(error));
    }

    /// Every invocation made so far, oldest first.
    pub async fn invocations(&self) -> Vec<RecordedInvoke> {
        self.invocations.lock().await.clone()
    }
}

#[async_trait]
impl CapabilityAdapter for ScriptedCapability {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Value,
        ctx: &CapabilityContext,
    ) -> Result<ToolPayload, AdjutantError> {
        self.invocations.lock().await.push(RecordedInvoke {
            action: action.to_string(),
            params: params.clone(),
            user_id: ctx.user_id.clone(),
        });
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AdjutantError::tool("scripted capability has no queued result")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn results_are_dealt_in_order() {
        let cap = ScriptedCapability::new("mail");
        cap.push_payload(ToolPayload::Items(vec![json!({"id": "m1"})]))
            .await;
        cap.push_error(AdjutantError::tool("quota exhausted")).await;

        let ctx = CapabilityContext::new("u1");
        let first = cap.invoke("fetch_emails", &json!({}), &ctx).await.unwrap();
        let second = cap.invoke("fetch_emails", &json!({}), &ctx).await;

        match first {
            ToolPayload::Items(items) => assert_eq!(items[0]["id"], "m1"),
            other => panic!("expected items, got {other:?}"),
        }
        assert!(second.unwrap_err().to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn empty_queue_errors() {
        let cap = ScriptedCapability::new("calendar");
        let ctx = CapabilityContext::new("u1");

        let err = cap
            .invoke("get_today_schedule", &json!({}), &ctx)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no queued result"));
    }

    #[tokio::test]
    async fn invocations_are_recorded() {
        let cap = ScriptedCapability::new("mail");
        cap.push_payload(ToolPayload::Record(json!({"ok": true})))
            .await;

        let ctx = CapabilityContext::new("user-7");
        cap.invoke("send_email", &json!({"to": "a@b.c"}), &ctx)
            .await
            .unwrap();

        let calls = cap.invocations().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, "send_email");
        assert_eq!(calls[0].params["to"], "a@b.c");
        assert_eq!(calls[0].user_id, "user-7");
    }
}
