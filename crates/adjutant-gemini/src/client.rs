// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Handles request construction, key authentication, and transient error
//! retry (429, 500, 503, 529; one retry after a 1-second delay).

use std::time::Duration;

use adjutant_config::model::ModelConfig;
use adjutant_core::AdjutantError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateRequest, GenerateResponse};

/// Base URL for the Gemini generative language API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    api_key: String,
    max_retries: u32,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client from model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self, AdjutantError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AdjutantError::Config("model.api_key is required".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdjutantError::Model {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a completion request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 503, 529), retries once after a
    /// 1-second delay.
    pub async fn generate_content(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AdjutantError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .query(&[("key", &self.api_key)])
                .json(request)
                .send()
                .await
                .map_err(|e| AdjutantError::Model {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                return response.json().await.map_err(|e| AdjutantError::Model {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(AdjutantError::model(format!(
                    "API returned {status}: {body}"
                )));
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Gemini API error ({}): {}",
                    api_err.error.status, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(AdjutantError::model(message));
        }

        Err(last_error
            .unwrap_or_else(|| AdjutantError::model("completion request failed after retries")))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
