// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword intent routing over an ordered trigger table.
//!
//! Maps a user message to a capability action by scanning an ordered table
//! of trigger phrases. First match wins, so earlier rows shadow later ones
//! and the outcome is fully reproducible from the table. No classifier, no
//! network, no latency.

use serde_json::Value;
use tracing::info;

/// One row of the trigger table.
#[derive(Debug, Clone, Copy)]
struct TriggerRule {
    /// Substring searched for in the lowered message.
    phrase: &'static str,
    capability: &'static str,
    action: &'static str,
}

const fn rule(phrase: &'static str, capability: &'static str, action: &'static str) -> TriggerRule {
    TriggerRule {
        phrase,
        capability,
        action,
    }
}

/// Ordered trigger table. Mail rows are checked before calendar rows, and
/// within each group rows are evaluated top to bottom.
const TRIGGER_RULES: &[TriggerRule] = &[
    rule("inbox", "mail", "fetch_emails"),
    rule("email", "mail", "fetch_emails"),
    rule("mail", "mail", "fetch_emails"),
    rule("unread", "mail", "get_important_emails"),
    rule("important emails", "mail", "get_important_emails"),
    rule("send email", "mail", "send_email"),
    rule("reply", "mail", "send_email"),
    rule("calendar", "calendar", "get_upcoming_events"),
    rule("schedule", "calendar", "get_today_schedule"),
    rule("today", "calendar", "get_today_schedule"),
    rule("meetings", "calendar", "get_upcoming_events"),
    rule("events", "calendar", "get_upcoming_events"),
    rule("next meeting", "calendar", "get_next_meeting"),
    rule("available", "calendar", "check_availability"),
    rule("free", "calendar", "check_availability"),
];

/// A matched capability action with its default parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    /// Capability registry name, e.g. `mail`.
    pub capability: String,
    /// Action within the capability, e.g. `fetch_emails`.
    pub action: String,
    /// Default parameters for the action. Always an empty object today;
    /// parameter inference from the message is out of scope.
    pub params: Value,
}

/// Scans messages against the static trigger table.
pub struct IntentRouter;

impl IntentRouter {
    /// Create a new intent router.
    pub fn new() -> Self {
        Self
    }

    /// Route a message to a capability action, or `None` when no trigger
    /// phrase occurs in it. Matching is case-insensitive and purely
    /// substring-based.
    pub fn route(&self, message: &str) -> Option<RoutingDecision> {
        let lowered = message.to_lowercase();
        for rule in TRIGGER_RULES {
            if lowered.contains(rule.phrase) {
                info!(
                    capability = rule.capability,
                    action = rule.action,
                    trigger = rule.phrase,
                    "matched capability trigger"
                );
                return Some(RoutingDecision {
                    capability: rule.capability.to_string(),
                    action: rule.action.to_string(),
                    params: Value::Object(serde_json::Map::new()),
                });
            }
        }
        None
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}
