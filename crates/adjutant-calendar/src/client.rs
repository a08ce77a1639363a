// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Google Calendar REST API.
//!
//! Lists events from the primary calendar with bearer authentication
//! and Google error-body decoding.

use std::time::Duration;

use adjutant_core::AdjutantError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Events collection of the authenticated account's primary calendar.
const API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Per-request timeout for all Calendar calls.
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

/// HTTP client for Calendar API communication.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    /// Creates a new Calendar client authenticated with a bearer access token.
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

    /// Lists single events in a time window, ordered by start time.
    ///
    /// `max_results` is omitted from the request when `None`, letting the
    /// API apply its own page size.
    pub async fn list_events(
        &self,
        time_min: &str,
        time_max: &str,
        max_results: Option<u64>,
    ) -> Result<Vec<Value>, AdjutantError> {
        let mut query = vec![
            ("timeMin".to_string(), time_min.to_string()),
            ("timeMax".to_string(), time_max.to_string()),
            ("singleEvents".to_string(), "true".to_string()),
            ("orderBy".to_string(), "startTime".to_string()),
        ];
        if let Some(max_results) = max_results {
            query.push(("maxResults".to_string(), max_results.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AdjutantError::Tool {
                message: format!("Calendar request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "Calendar response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Calendar API error ({}): {}",
                    api_err.error.status, api_err.error.message
                )
            } else {
                format!("Calendar API returned {status}: {body}")
            };
            return Err(AdjutantError::tool(message));
        }

        let body: Value = response.json().await.map_err(|e| AdjutantError::Tool {
            message: format!("failed to parse Calendar response: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(body["items"].as_array().cloned().unwrap_or_default())
    }
}
