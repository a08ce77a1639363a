// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini model adapter for the Adjutant agent.
//!
//! This crate provides:
//! - [`GeminiClient`]: HTTP client for `generateContent` with transient retry
//! - [`GeminiModel`]: [`ModelAdapter`] carrying the grounding as the API's
//!   native system instruction

pub mod client;
pub mod types;

use adjutant_config::model::ModelConfig;
use adjutant_core::{AdjutantError, ModelAdapter, ModelTurn};
use async_trait::async_trait;

pub use client::GeminiClient;

use crate::types::{Content, GenerateRequest, GenerationConfig, InstructionBlock, Part};

/// Gemini-backed language model adapter.
pub struct GeminiModel {
    client: GeminiClient,
    temperature: f64,
}

impl GeminiModel {
    /// Creates the adapter from model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self, AdjutantError> {
        Ok(Self {
            client: GeminiClient::new(config)?,
            temperature: config.temperature,
        })
    }

    /// Overrides the API base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl ModelAdapter for GeminiModel {
    async fn generate(
        &self,
        system: &str,
        turns: &[ModelTurn],
    ) -> Result<String, AdjutantError> {
        let system_instruction = (!system.is_empty()).then(|| InstructionBlock {
            parts: vec![Part {
                text: system.to_string(),
            }],
        });
        let contents = turns
            .iter()
            .map(|turn| Content {
                role: turn.role.as_str().to_string(),
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        let request = GenerateRequest {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self.client.generate_content(&request).await?;
        response
            .first_candidate_text()
            .ok_or_else(|| AdjutantError::model("model returned no candidates"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_model(base_url: &str) -> GeminiModel {
        let config = ModelConfig {
            api_key: Some("test-key".into()),
            ..ModelConfig::default()
        };
        GeminiModel::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn generate_sends_system_and_turns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "reply"}]}}]
            })))
            .mount(&server)
            .await;

        let turns = vec![
            ModelTurn::user("earlier question"),
            ModelTurn::model("earlier answer"),
            ModelTurn::user("current question"),
        ];
        let reply = test_model(&server.uri())
            .generate("ground rules", &turns)
            .await
            .unwrap();
        assert_eq!(reply, "reply");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "ground rules");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "current question");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
    }

    #[tokio::test]
    async fn generate_omits_empty_system_instruction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .mount(&server)
            .await;

        test_model(&server.uri())
            .generate("", &[ModelTurn::user("hi")])
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[tokio::test]
    async fn generate_fails_when_no_candidates_return() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = test_model(&server.uri())
            .generate("", &[ModelTurn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, AdjutantError::Model { .. }));
    }
}
