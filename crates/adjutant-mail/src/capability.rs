// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail capability backed by the Gmail REST API.
//!
//! Exposes inbox fetch, search, detail lookup, send with reply threading,
//! and an unread/important digest as registry actions over [`GmailClient`].

use adjutant_core::{AdjutantError, CapabilityAdapter, CapabilityContext, ToolPayload};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::client::GmailClient;

/// Default number of messages returned by a fetch.
const DEFAULT_FETCH_LIMIT: u64 = 10;

/// Messages returned by the unread/important digest.
const IMPORTANT_FETCH_LIMIT: u64 = 15;

/// Days the unread/important digest looks back by default.
const DEFAULT_IMPORTANT_DAYS: i64 = 3;

/// Snippet length kept on fetched rows.
const SNIPPET_CHARS: usize = 100;

/// Mail actions exposed to the agent's capability registry.
pub struct MailCapability {
    client: GmailClient,
}

impl MailCapability {
    /// Creates the mail capability from a bearer access token.
    pub fn new(access_token: &str) -> Result<Self, AdjutantError> {
        Ok(Self {
            client: GmailClient::new(access_token)?,
        })
    }

    /// Overrides the Gmail base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Fetch recent message summaries. An empty query means the inbox.
    async fn fetch_emails(
        &self,
        max_results: u64,
        query: &str,
        ctx: &CapabilityContext,
    ) -> Result<Vec<Value>, AdjutantError> {
        let search_query = if query.is_empty() { "in:inbox" } else { query };
        let ids = self.client.list_message_ids(search_query, max_results).await?;

        let mut rows = Vec::with_capacity(ids.len());
        for id in &ids {
            let message = self.client.get_message_metadata(id).await?;
            rows.push(summary_row(id, &message));
        }

        info!(count = rows.len(), user_id = %ctx.user_id, "fetched emails");
        Ok(rows)
    }

    /// Full detail record for one message, with a decoded plain-text body.
    async fn email_details(&self, message_id: &str) -> Result<Value, AdjutantError> {
        let message = self.client.get_message_full(message_id).await?;
        let body = extract_body(&message["payload"])?;

        Ok(json!({
            "id": message_id,
            "from": header_value(&message, "From").unwrap_or("Unknown"),
            "to": header_value(&message, "To").unwrap_or(""),
            "subject": header_value(&message, "Subject").unwrap_or("(No subject)"),
            "date": header_value(&message, "Date").unwrap_or(""),
            "body": body,
            "labels": message["labelIds"].clone(),
        }))
    }

    /// Send a message, threading onto the original when replying.
    ///
    /// A reply whose subject does not already start with `re:` takes
    /// `Re: {original subject}` instead of the provided subject.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        reply_to_id: Option<&str>,
    ) -> Result<Value, AdjutantError> {
        let mut final_subject = subject.to_string();
        let mut thread_id = None;

        if let Some(reply_id) = reply_to_id {
            let original = self.client.get_message_metadata(reply_id).await?;
            thread_id = original["threadId"].as_str().map(str::to_string);
            if !subject.to_lowercase().starts_with("re:") {
                let original_subject = header_value(&original, "Subject").unwrap_or("");
                final_subject = format!("Re: {original_subject}");
            }
        }

        let raw = build_raw_message(to, &final_subject, body);
        let result = self.client.send_message(&raw, thread_id.as_deref()).await?;

        info!(message_id = ?result["id"].as_str(), "email sent");
        Ok(json!({
            "success": true,
            "message_id": result["id"],
            "thread_id": result["threadId"],
        }))
    }

    /// Unread or important messages from the last `days` days.
    async fn important_emails(
        &self,
        days: i64,
        ctx: &CapabilityContext,
    ) -> Result<Vec<Value>, AdjutantError> {
        let after = (Utc::now() - Duration::days(days)).format("%Y/%m/%d");
        let query = format!("is:unread OR is:important after:{after}");
        self.fetch_emails(IMPORTANT_FETCH_LIMIT, &query, ctx).await
    }
}

#[async_trait]
impl CapabilityAdapter for MailCapability {
    fn name(&self) -> &str {
        "mail"
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Value,
        ctx: &CapabilityContext,
    ) -> Result<ToolPayload, AdjutantError> {
        match action {
            "fetch_emails" => {
                let max_results = params["max_results"].as_u64().unwrap_or(DEFAULT_FETCH_LIMIT);
                let query = params["query"].as_str().unwrap_or("");
                Ok(ToolPayload::Items(
                    self.fetch_emails(max_results, query, ctx).await?,
                ))
            }
            "search_emails" => {
                let query = require_str(params, "query")?;
                let max_results = params["max_results"].as_u64().unwrap_or(DEFAULT_FETCH_LIMIT);
                Ok(ToolPayload::Items(
                    self.fetch_emails(max_results, query, ctx).await?,
                ))
            }
            "get_email_details" => {
                let message_id = require_str(params, "message_id")?;
                Ok(ToolPayload::Record(self.email_details(message_id).await?))
            }
            "send_email" => {
                let to = require_str(params, "to")?;
                let subject = require_str(params, "subject")?;
                let body = require_str(params, "body")?;
                let reply_to_id = params["reply_to_id"].as_str();
                match self.send_email(to, subject, body, reply_to_id).await {
                    Ok(receipt) => Ok(ToolPayload::Record(receipt)),
                    Err(e) => {
                        warn!(error = %e, "email send failed");
                        Ok(ToolPayload::Record(json!({
                            "success": false,
                            "error": e.to_string(),
                        })))
                    }
                }
            }
            "get_important_emails" => {
                let days = params["days"]
                    .as_i64()
                    .unwrap_or(DEFAULT_IMPORTANT_DAYS)
                    .max(0);
                Ok(ToolPayload::Items(self.important_emails(days, ctx).await?))
            }
            _ => Err(AdjutantError::ToolNotFound {
                capability: self.name().to_string(),
                action: action.to_string(),
            }),
        }
    }
}

/// Looks up one header value by name in a message's payload headers.
fn header_value<'a>(message: &'a Value, name: &str) -> Option<&'a str> {
    message["payload"]["headers"]
        .as_array()?
        .iter()
        .find(|h| h["name"].as_str() == Some(name))
        .and_then(|h| h["value"].as_str())
}

/// Summary row shape shared by fetch and the important digest.
fn summary_row(id: &str, message: &Value) -> Value {
    let snippet = message["snippet"].as_str().unwrap_or("");
    json!({
        "id": id,
        "from": header_value(message, "From").unwrap_or("Unknown"),
        "subject": header_value(message, "Subject").unwrap_or("(No subject)"),
        "date": header_value(message, "Date").unwrap_or(""),
        "snippet": truncate_chars(snippet, SNIPPET_CHARS),
    })
}

/// Truncates to a character count without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Plain-text body of a Gmail payload tree.
///
/// Prefers the top-level body data; otherwise takes the first `text/plain`
/// part. Messages with neither decode to an empty body.
fn extract_body(payload: &Value) -> Result<String, AdjutantError> {
    if let Some(data) = payload["body"]["data"].as_str().filter(|d| !d.is_empty()) {
        return decode_body_data(data);
    }
    if let Some(parts) = payload["parts"].as_array() {
        for part in parts {
            if part["mimeType"].as_str() == Some("text/plain") {
                if let Some(data) = part["body"]["data"].as_str().filter(|d| !d.is_empty()) {
                    return decode_body_data(data);
                }
            }
        }
    }
    Ok(String::new())
}

/// Decodes base64url body data, tolerating both padded and unpadded forms.
fn decode_body_data(data: &str) -> Result<String, AdjutantError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(data.trim_end_matches('='))
        .map_err(|e| AdjutantError::tool(format!("invalid message body encoding: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AdjutantError::tool(format!("message body is not valid UTF-8: {e}")))
}

/// Builds the base64url-encoded RFC 2822 message Gmail expects in `raw`.
fn build_raw_message(to: &str, subject: &str, body: &str) -> String {
    let message = format!(
        "To: {to}\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=\"utf-8\"\r\nMIME-Version: 1.0\r\n\r\n{body}"
    );
    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

/// Fetches a required string parameter or fails the action.
fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, AdjutantError> {
    params[key]
        .as_str()
        .ok_or_else(|| AdjutantError::tool(format!("missing required parameter '{key}'")))
}
