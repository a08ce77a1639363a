// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gmail REST API.
//!
//! Thin wrapper over `users/me` message endpoints with bearer
//! authentication and Google error-body decoding.

use std::time::Duration;

use adjutant_core::AdjutantError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Base URL for Gmail message operations on the authenticated account.
const API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Per-request timeout for all Gmail calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body shape returned by Google APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

/// HTTP client for Gmail API communication.
#[derive(Debug, Clone)]
pub struct GmailClient {
    client: reqwest::Client,
    base_url: String,
}

impl GmailClient {
    /// Creates a new Gmail client authenticated with a bearer access token.
    pub fn new(access_token: &str) -> Result<Self, AdjutantError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {access_token}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                AdjutantError::Config(format!("invalid access token header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdjutantError::Tool {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Lists message ids matching a Gmail search query.
    pub async fn list_message_ids(
        &self,
        query: &str,
        max_results: u64,
    ) -> Result<Vec<String>, AdjutantError> {
        let url = format!("{}/messages", self.base_url);
        let body = self
            .request_json(
                self.client
                    .get(&url)
                    .query(&[("q", query), ("maxResults", &max_results.to_string())]),
            )
            .await?;

        let ids = body["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    /// Fetches one message with From/Subject/Date headers and its snippet.
    pub async fn get_message_metadata(&self, id: &str) -> Result<Value, AdjutantError> {
        let url = format!("{}/messages/{id}", self.base_url);
        self.request_json(self.client.get(&url).query(&[
            ("format", "metadata"),
            ("metadataHeaders", "From"),
            ("metadataHeaders", "Subject"),
            ("metadataHeaders", "Date"),
        ]))
        .await
    }

    /// Fetches one message with its full payload tree.
    pub async fn get_message_full(&self, id: &str) -> Result<Value, AdjutantError> {
        let url = format!("{}/messages/{id}", self.base_url);
        self.request_json(self.client.get(&url).query(&[("format", "full")]))
            .await
    }

    /// Sends a raw RFC 2822 message, optionally threading onto a reply.
    pub async fn send_message(
        &self,
        raw: &str,
        thread_id: Option<&str>,
    ) -> Result<Value, AdjutantError> {
        let url = format!("{}/messages/send", self.base_url);
        let mut body = serde_json::Map::new();
        body.insert("raw".to_string(), Value::String(raw.to_string()));
        if let Some(thread_id) = thread_id {
            body.insert("threadId".to_string(), Value::String(thread_id.to_string()));
        }
        self.request_json(self.client.post(&url).json(&Value::Object(body)))
            .await
    }

    /// Sends one request and decodes the JSON body, mapping API errors.
    async fn request_json(&self, request: reqwest::RequestBuilder) -> Result<Value, AdjutantError> {
        let response = request.send().await.map_err(|e| AdjutantError::Tool {
            message: format!("Gmail request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(status = %status, "Gmail response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Gmail API error ({}): {}",
                    api_err.error.status, api_err.error.message
                )
            } else {
                format!("Gmail API returned {status}: {body}")
            };
            return Err(AdjutantError::tool(message));
        }

        response.json().await.map_err(|e| AdjutantError::Tool {
            message: format!("failed to parse Gmail response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GmailClient {
        GmailClient::new("test-token")
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn list_message_ids_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(query_param("q", "in:inbox"))
            .and(query_param("maxResults", "10"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": [{"id": "m1"}, {"id": "m2"}],
                "resultSizeEstimate": 2
            })))
            .mount(&server)
            .await;

        let ids = test_client(&server.uri())
            .list_message_ids("in:inbox", 10)
            .await
            .unwrap();
        assert_eq!(ids, vec!["m1".to_string(), "m2".to_string()]);
    }

    #[tokio::test]
    async fn list_message_ids_empty_mailbox() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"resultSizeEstimate": 0})),
            )
            .mount(&server)
            .await;

        let ids = test_client(&server.uri())
            .list_message_ids("in:inbox", 10)
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn api_error_body_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": 403, "message": "Insufficient scope", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .list_message_ids("in:inbox", 10)
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("PERMISSION_DENIED"), "got: {text}");
        assert!(text.contains("Insufficient scope"), "got: {text}");
    }

    #[tokio::test]
    async fn send_message_includes_thread_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "sent1", "threadId": "t9"
            })))
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .send_message("cmF3", Some("t9"))
            .await
            .unwrap();
        assert_eq!(result["id"], "sent1");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["raw"], "cmF3");
        assert_eq!(body["threadId"], "t9");
    }

    #[tokio::test]
    async fn send_message_omits_thread_id_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages/send"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "sent2"})),
            )
            .mount(&server)
            .await;

        test_client(&server.uri())
            .send_message("cmF3", None)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("threadId").is_none());
    }
}
