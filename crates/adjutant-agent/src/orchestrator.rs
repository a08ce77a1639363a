// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message-handling pipeline.
//!
//! [`Orchestrator::handle_message`] drives one message through the stages of
//! [`PipelineStage`]: retrieve memory, analyze intent, execute a tool when
//! routing matched, generate the response, extract new facts. Every stage
//! absorbs its own failures and degrades, so the caller always gets a
//! response string and the user never sees a raw error.

use std::collections::HashMap;
use std::sync::Arc;

use adjutant_config::model::MemoryConfig;
use adjutant_core::error::AdjutantError;
use adjutant_core::types::{
    CapabilityContext, ConversationTurn, ModelTurn, ToolPayload, ToolReport, TurnRole,
};
use adjutant_core::{CapabilityAdapter, ModelAdapter};
use adjutant_memory::{FactStore, MemoryExtractor, MemoryFact, RetrievalEngine};
use adjutant_router::{IntentRouter, RoutingDecision};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::stage::{advance, PipelineStage};
use crate::synthesis::{self, MODEL_APOLOGY, PIPELINE_APOLOGY};

/// Actions whose results are lists of records. Degraded payloads for these
/// carry the error as the single list item so the digest renders the same
/// warning a real tool failure would.
const LIST_SHAPED_ACTIONS: &[&str] = &[
    "fetch_emails",
    "search_emails",
    "get_important_emails",
    "get_upcoming_events",
    "get_today_schedule",
];

/// Coordinates memory, routing, capabilities, and the model for one user
/// message at a time. All collaborators are injected at construction.
pub struct Orchestrator {
    store: Arc<FactStore>,
    retrieval: RetrievalEngine,
    extractor: Arc<MemoryExtractor>,
    router: IntentRouter,
    capabilities: HashMap<String, Arc<dyn CapabilityAdapter>>,
    model: Arc<dyn ModelAdapter>,
    tuning: MemoryConfig,
}

impl Orchestrator {
    /// Create an orchestrator. Capabilities are keyed by their registry name.
    pub fn new(
        store: Arc<FactStore>,
        extractor: Arc<MemoryExtractor>,
        router: IntentRouter,
        capabilities: Vec<Arc<dyn CapabilityAdapter>>,
        model: Arc<dyn ModelAdapter>,
        tuning: MemoryConfig,
    ) -> Self {
        let capabilities: HashMap<String, Arc<dyn CapabilityAdapter>> = capabilities
            .into_iter()
            .map(|adapter| (adapter.name().to_string(), adapter))
            .collect();
        info!(
            capabilities = capabilities.len(),
            "orchestrator initialized"
        );
        Self {
            retrieval: RetrievalEngine::new(store.clone(), tuning.clone()),
            store,
            extractor,
            router,
            capabilities,
            model,
            tuning,
        }
    }

    /// Handle one user message and return the assistant's reply.
    ///
    /// `history` is the prior conversation, oldest first, not including the
    /// message being handled. This never fails outward; any error that no
    /// stage absorbed becomes a generic apology.
    pub async fn handle_message(
        &self,
        user_id: &str,
        message: &str,
        history: &[ConversationTurn],
    ) -> String {
        match self.run_pipeline(user_id, message, history).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, user_id, "pipeline failed");
                PIPELINE_APOLOGY.to_string()
            }
        }
    }

    async fn run_pipeline(
        &self,
        user_id: &str,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<String, AdjutantError> {
        debug!(user_id, "handling message");

        let mut stage = PipelineStage::RetrieveMemory;
        let mut facts: Vec<MemoryFact> = Vec::new();
        let mut decision: Option<RoutingDecision> = None;
        let mut report: Option<ToolReport> = None;
        let mut response = String::new();

        loop {
            debug!(stage = %stage, "entering pipeline stage");
            match stage {
                PipelineStage::RetrieveMemory => {
                    facts = self.retrieve_memory(user_id, message).await;
                    stage = advance(stage, false);
                }
                PipelineStage::AnalyzeIntent => {
                    decision = self.router.route(message);
                    stage = advance(stage, decision.is_some());
                }
                PipelineStage::ExecuteTool => {
                    if let Some(decision) = &decision {
                        report = Some(self.execute_tool(user_id, decision).await);
                    }
                    stage = advance(stage, false);
                }
                PipelineStage::GenerateResponse => {
                    response = self
                        .generate_response(message, history, &facts, report.as_ref())
                        .await;
                    stage = advance(stage, false);
                }
                PipelineStage::ExtractMemory => {
                    self.extract_memory(user_id, message, report.as_ref()).await;
                    stage = advance(stage, false);
                }
                PipelineStage::Done => break,
            }
        }

        Ok(response)
    }

    /// RetrieveMemory: relevant facts for the message, or none on failure.
    async fn retrieve_memory(&self, user_id: &str, message: &str) -> Vec<MemoryFact> {
        match self
            .retrieval
            .retrieve(user_id, message, self.tuning.retrieval_limit)
            .await
        {
            Ok(facts) => {
                info!(count = facts.len(), user_id, "retrieved memory context");
                facts
            }
            Err(e) => {
                warn!(error = %e, user_id, "memory retrieval failed, continuing without context");
                Vec::new()
            }
        }
    }

    /// ExecuteTool: invoke the routed action; failures become degraded
    /// payloads shaped like the action's normal result.
    async fn execute_tool(&self, user_id: &str, decision: &RoutingDecision) -> ToolReport {
        let payload = match self.capabilities.get(&decision.capability) {
            None => {
                warn!(
                    capability = decision.capability.as_str(),
                    action = decision.action.as_str(),
                    "tool not found"
                );
                ToolPayload::Record(json!({ "error": "Tool not found" }))
            }
            Some(adapter) => {
                let ctx = CapabilityContext::new(user_id);
                match adapter.invoke(&decision.action, &decision.params, &ctx).await {
                    Ok(payload) => {
                        info!(
                            capability = decision.capability.as_str(),
                            action = decision.action.as_str(),
                            "tool executed"
                        );
                        payload
                    }
                    Err(e) => {
                        warn!(
                            capability = decision.capability.as_str(),
                            action = decision.action.as_str(),
                            error = %e,
                            "tool execution failed"
                        );
                        degraded_payload(&decision.action, &e.to_string())
                    }
                }
            }
        };
        ToolReport {
            capability: decision.capability.clone(),
            action: decision.action.clone(),
            payload,
        }
    }

    /// GenerateResponse: grounding plus transcript into the model; a model
    /// failure becomes the apology text.
    async fn generate_response(
        &self,
        message: &str,
        history: &[ConversationTurn],
        facts: &[MemoryFact],
        report: Option<&ToolReport>,
    ) -> String {
        let grounding = synthesis::build_grounding(facts, report);

        let mut turns: Vec<ModelTurn> = history
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => ModelTurn::user(&turn.content),
                TurnRole::Assistant => ModelTurn::model(&turn.content),
            })
            .collect();
        turns.push(ModelTurn::user(message));

        match self.model.generate(&grounding, &turns).await {
            Ok(text) => {
                info!(turns = turns.len(), "response generated");
                text
            }
            Err(e) => {
                error!(error = %e, "response generation failed");
                MODEL_APOLOGY.to_string()
            }
        }
    }

    /// ExtractMemory: harvest facts from the user turn, and from fetched
    /// email records when this run produced them. Persistence failures are
    /// logged and swallowed.
    async fn extract_memory(&self, user_id: &str, message: &str, report: Option<&ToolReport>) {
        let mut candidates = self.extractor.extract_from_turn(message);

        if let Some(report) = report
            && report.capability == "mail"
            && let ToolPayload::Items(items) = &report.payload
        {
            candidates.extend(self.extractor.extract_from_emails(items));
        }

        if candidates.is_empty() {
            return;
        }

        match self
            .store
            .append_or_merge(user_id, candidates, self.tuning.default_confidence)
            .await
        {
            Ok(stored) => info!(stored, user_id, "extracted facts from conversation"),
            Err(e) => warn!(error = %e, user_id, "memory extraction failed"),
        }
    }
}

/// Degraded payload matching the action's normal result shape.
fn degraded_payload(action: &str, message: &str) -> ToolPayload {
    if LIST_SHAPED_ACTIONS.contains(&action) {
        ToolPayload::error_items(message)
    } else {
        ToolPayload::error_record(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_actions_degrade_to_items() {
        for action in LIST_SHAPED_ACTIONS {
            match degraded_payload(action, "boom") {
                ToolPayload::Items(items) => {
                    assert_eq!(items.len(), 1);
                    assert_eq!(items[0]["error"], "boom");
                }
                other => panic!("{action} should degrade to items, got {other:?}"),
            }
        }
    }

    #[test]
    fn record_actions_degrade_to_records() {
        for action in ["send_email", "get_email_details", "check_availability", "get_next_meeting"] {
            match degraded_payload(action, "boom") {
                ToolPayload::Record(record) => assert_eq!(record["error"], "boom"),
                other => panic!("{action} should degrade to a record, got {other:?}"),
            }
        }
    }
}
