// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grounding assembly for response generation.
//!
//! Builds the system text sent to the model: the persona preamble, a block
//! of remembered facts, and a digest of whatever the tool stage produced.
//! Degraded tool payloads render as warning lines so the model can explain
//! the failure to the user instead of hallucinating data.

use adjutant_core::types::{ToolPayload, ToolReport};
use adjutant_memory::MemoryFact;
use serde_json::Value;

/// Persona and capability briefing, always the first part of the grounding.
pub const SYSTEM_PREAMBLE: &str = concat!(
    "You are an intelligent AI assistant acting as a personal \"Chief of Staff\". \n",
    "You help users manage their day by accessing their Gmail and Calendar when needed.\n",
    "\n",
    "Your capabilities:\n",
    "- Read and summarize emails from the user's inbox\n",
    "- Check calendar events and schedules\n",
    "- Help draft and send email replies\n",
    "- Remember user preferences and context\n",
    "\n",
    "Be concise, professional, and proactive. Provide actionable insights.",
);

/// Shown when the model call itself fails.
pub const MODEL_APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

/// Shown when the pipeline fails in a way no stage absorbed.
pub const PIPELINE_APOLOGY: &str =
    "I apologize, but I encountered an error. Please try again.";

/// How many tool result rows make it into the digest.
const DIGEST_ITEM_LIMIT: usize = 5;

/// How many characters of an email snippet the digest previews.
const PREVIEW_CHARS: usize = 80;

/// Assemble the full grounding text for one model call.
pub fn build_grounding(facts: &[MemoryFact], report: Option<&ToolReport>) -> String {
    let mut grounding = String::from(SYSTEM_PREAMBLE);

    if !facts.is_empty() {
        let memory_text = facts
            .iter()
            .map(|fact| {
                format!(
                    "• {} (confidence: {:.0}%)",
                    fact.content,
                    fact.confidence * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        grounding.push_str("\n\n📝 What I remember about you:\n");
        grounding.push_str(&memory_text);
    }

    if let Some(report) = report
        && let Some(block) = tool_block(report)
    {
        grounding.push_str(&block);
    }

    grounding
}

/// Render one tool report as a grounding block, or nothing for an empty list.
fn tool_block(report: &ToolReport) -> Option<String> {
    match &report.payload {
        ToolPayload::Items(items) => {
            let first = items.first()?;
            if let Some(error) = first.get("error").and_then(Value::as_str) {
                Some(format!("\n\n⚠️ Could not access data: {error}"))
            } else {
                Some(format!(
                    "\n\n📊 Data retrieved:\n{}",
                    digest_items(&report.capability, items)
                ))
            }
        }
        ToolPayload::Record(record) => {
            if let Some(error) = record.get("error").and_then(Value::as_str) {
                Some(format!("\n\n⚠️ Error: {error}"))
            } else {
                let pretty = serde_json::to_string_pretty(record)
                    .unwrap_or_else(|_| record.to_string());
                Some(format!("\n\n📊 Data retrieved:\n{pretty}"))
            }
        }
    }
}

/// Digest list results per capability; unknown capabilities fall back to JSON.
fn digest_items(capability: &str, items: &[Value]) -> String {
    let rows = items.iter().take(DIGEST_ITEM_LIMIT);
    match capability {
        "mail" => rows.map(mail_row).collect::<Vec<_>>().join("\n"),
        "calendar" => rows.map(calendar_row).collect::<Vec<_>>().join("\n"),
        _ => serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string()),
    }
}

fn mail_row(item: &Value) -> String {
    let from = item.get("from").and_then(Value::as_str).unwrap_or("Unknown");
    let subject = item
        .get("subject")
        .and_then(Value::as_str)
        .unwrap_or("No subject");
    let snippet = item.get("snippet").and_then(Value::as_str).unwrap_or("");
    let preview: String = snippet.chars().take(PREVIEW_CHARS).collect();
    format!("• From: {from}\n  Subject: {subject}\n  Preview: {preview}...")
}

fn calendar_row(item: &Value) -> String {
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("No title");
    let start = item.get("start").and_then(Value::as_str).unwrap_or("Unknown");
    let location = item
        .get("location")
        .and_then(Value::as_str)
        .unwrap_or("No location");
    format!("• {title}\n  Time: {start}\n  Location: {location}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_memory::{FactCategory, FactSource};
    use serde_json::json;

    fn fact(content: &str, confidence: f64) -> MemoryFact {
        MemoryFact {
            id: "f1".into(),
            user_id: "u1".into(),
            content: content.into(),
            category: FactCategory::Preference,
            source: FactSource::Chat,
            confidence,
            extra_data: json!({}),
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    fn mail_report(payload: ToolPayload) -> ToolReport {
        ToolReport {
            capability: "mail".into(),
            action: "fetch_emails".into(),
            payload,
        }
    }

    #[test]
    fn preamble_opens_the_grounding() {
        let grounding = build_grounding(&[], None);
        assert_eq!(grounding, SYSTEM_PREAMBLE);
        assert!(grounding.starts_with(
            "You are an intelligent AI assistant acting as a personal \"Chief of Staff\". \n"
        ));
        assert!(grounding.ends_with("Provide actionable insights."));
    }

    #[test]
    fn memory_block_lists_facts_with_whole_percent_confidence() {
        let facts = vec![
            fact("User prefers morning meetings", 0.9),
            fact("Working with Acme Corp", 0.85),
        ];

        let grounding = build_grounding(&facts, None);

        assert!(grounding.contains(concat!(
            "\n\n📝 What I remember about you:\n",
            "• User prefers morning meetings (confidence: 90%)\n",
            "• Working with Acme Corp (confidence: 85%)"
        )));
    }

    #[test]
    fn mail_digest_covers_first_five_rows() {
        let items: Vec<Value> = (1..=6)
            .map(|n| {
                json!({
                    "from": format!("sender{n}@example.com"),
                    "subject": format!("Subject {n}"),
                    "snippet": format!("snippet {n}"),
                })
            })
            .collect();

        let grounding = build_grounding(&[], Some(&mail_report(ToolPayload::Items(items))));

        assert!(grounding.contains("\n\n📊 Data retrieved:\n"));
        assert!(grounding.contains(
            "• From: sender1@example.com\n  Subject: Subject 1\n  Preview: snippet 1..."
        ));
        assert!(grounding.contains("sender5@example.com"));
        assert!(!grounding.contains("sender6@example.com"));
    }

    #[test]
    fn mail_digest_fills_missing_fields_and_truncates_preview() {
        let long_snippet = "a".repeat(120);
        let items = vec![json!({ "snippet": long_snippet })];

        let grounding = build_grounding(&[], Some(&mail_report(ToolPayload::Items(items))));

        let expected_preview = format!("Preview: {}...", "a".repeat(80));
        assert!(grounding.contains("• From: Unknown\n  Subject: No subject\n"));
        assert!(grounding.contains(&expected_preview));
        assert!(!grounding.contains(&"a".repeat(81)));
    }

    #[test]
    fn calendar_digest_uses_title_time_location_rows() {
        let report = ToolReport {
            capability: "calendar".into(),
            action: "get_today_schedule".into(),
            payload: ToolPayload::Items(vec![
                json!({"title": "Standup", "start": "2026-03-02T09:00:00Z", "location": "Room 4"}),
                json!({}),
            ]),
        };

        let grounding = build_grounding(&[], Some(&report));

        assert!(grounding.contains(
            "• Standup\n  Time: 2026-03-02T09:00:00Z\n  Location: Room 4\n"
        ));
        assert!(grounding.contains("• No title\n  Time: Unknown\n  Location: No location"));
    }

    #[test]
    fn empty_item_list_adds_no_block() {
        let grounding = build_grounding(&[], Some(&mail_report(ToolPayload::Items(vec![]))));
        assert_eq!(grounding, SYSTEM_PREAMBLE);
    }

    #[test]
    fn list_error_renders_access_warning() {
        let report = mail_report(ToolPayload::error_items("Gmail API error (403): denied"));

        let grounding = build_grounding(&[], Some(&report));

        assert!(grounding
            .contains("\n\n⚠️ Could not access data: Gmail API error (403): denied"));
        assert!(!grounding.contains("📊"));
    }

    #[test]
    fn record_error_renders_error_warning() {
        let report = ToolReport {
            capability: "mail".into(),
            action: "send_email".into(),
            payload: ToolPayload::Record(json!({"success": false, "error": "boom"})),
        };

        let grounding = build_grounding(&[], Some(&report));

        assert!(grounding.contains("\n\n⚠️ Error: boom"));
    }

    #[test]
    fn record_success_renders_pretty_json() {
        let report = ToolReport {
            capability: "calendar".into(),
            action: "check_availability".into(),
            payload: ToolPayload::Record(json!({"date": "2026-03-02"})),
        };

        let grounding = build_grounding(&[], Some(&report));

        assert!(grounding.contains("\n\n📊 Data retrieved:\n{\n  \"date\": \"2026-03-02\"\n}"));
    }

    #[test]
    fn null_record_renders_as_null() {
        let report = ToolReport {
            capability: "calendar".into(),
            action: "get_next_meeting".into(),
            payload: ToolPayload::Record(Value::Null),
        };

        let grounding = build_grounding(&[], Some(&report));

        assert!(grounding.ends_with("\n\n📊 Data retrieved:\nnull"));
    }
}
