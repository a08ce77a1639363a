// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar capability backed by the Google Calendar REST API.
//!
//! Exposes upcoming events, today's schedule, free-slot availability, and
//! next-meeting lookup as registry actions over [`CalendarClient`].

use adjutant_core::{AdjutantError, CapabilityAdapter, CapabilityContext, ToolPayload};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use tracing::info;

use crate::client::CalendarClient;

/// Days of lookahead for upcoming events.
const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Event cap for upcoming-event listings.
const DEFAULT_UPCOMING_LIMIT: u64 = 20;

/// Requested meeting length when checking availability.
const DEFAULT_SLOT_MINUTES: i64 = 60;

/// Working-day window for availability, in whole hours (UTC).
const WORKDAY_START_HOUR: u32 = 9;
const WORKDAY_END_HOUR: u32 = 18;

/// Description length kept on detailed event rows.
const DESCRIPTION_CHARS: usize = 200;

/// Attendee emails kept on detailed event rows.
const ATTENDEE_LIMIT: usize = 5;

/// Calendar actions exposed to the agent's capability registry.
pub struct CalendarCapability {
    client: CalendarClient,
}

impl CalendarCapability {
    /// Creates the calendar capability from a bearer access token.
    pub fn new(access_token: &str) -> Result<Self, AdjutantError> {
        Ok(Self {
            client: CalendarClient::new(access_token)?,
        })
    }

    /// Overrides the Calendar base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Events over the next `days` days, with description and attendees.
    async fn upcoming_events(
        &self,
        days: i64,
        max_results: u64,
        ctx: &CapabilityContext,
    ) -> Result<Vec<Value>, AdjutantError> {
        let now = Utc::now();
        let time_min = format_rfc3339(now);
        let time_max = format_rfc3339(now + Duration::days(days));

        let events = self
            .client
            .list_events(&time_min, &time_max, Some(max_results))
            .await?;
        let rows: Vec<Value> = events.iter().map(|e| event_row(e, true)).collect();

        info!(count = rows.len(), user_id = %ctx.user_id, "fetched events");
        Ok(rows)
    }

    /// Today's events (UTC midnight to midnight), without detail fields.
    async fn today_schedule(&self) -> Result<Vec<Value>, AdjutantError> {
        let start_of_day = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| Utc.from_utc_datetime(&t))
            .ok_or_else(|| AdjutantError::Internal("failed to build day window".to_string()))?;
        let end_of_day = start_of_day + Duration::days(1);

        let events = self
            .client
            .list_events(
                &format_rfc3339(start_of_day),
                &format_rfc3339(end_of_day),
                None,
            )
            .await?;
        Ok(events.iter().map(|e| event_row(e, false)).collect())
    }

    /// Free slots of at least `duration_minutes` in a working day.
    ///
    /// Walks the day's timed events in start order and emits the gaps large
    /// enough for the requested duration. All-day events do not block time.
    async fn check_availability(
        &self,
        date: &str,
        duration_minutes: i64,
    ) -> Result<Value, AdjutantError> {
        let target = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| AdjutantError::tool(format!("invalid date '{date}': {e}")))?;
        let day_start = day_at(target, WORKDAY_START_HOUR)?;
        let day_end = day_at(target, WORKDAY_END_HOUR)?;

        let events = self
            .client
            .list_events(&format_rfc3339(day_start), &format_rfc3339(day_end), None)
            .await?;

        let mut busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = events
            .iter()
            .filter_map(|event| {
                let start = parse_event_time(event["start"]["dateTime"].as_str()?)?;
                let end = parse_event_time(event["end"]["dateTime"].as_str()?)?;
                Some((start, end))
            })
            .collect();
        busy.sort();

        let wanted = Duration::minutes(duration_minutes);
        let mut free_slots = Vec::new();
        let mut current = day_start;

        for (busy_start, busy_end) in busy {
            if current + wanted <= busy_start {
                free_slots.push(slot(current, busy_start));
            }
            current = current.max(busy_end);
        }
        if current + wanted <= day_end {
            free_slots.push(slot(current, day_end));
        }

        let total_free_minutes: i64 = free_slots
            .iter()
            .filter_map(|s| s["duration_minutes"].as_i64())
            .sum();

        Ok(json!({
            "date": date,
            "free_slots": free_slots,
            "total_free_minutes": total_free_minutes,
        }))
    }

    /// First timed event starting in the future, or JSON null.
    async fn next_meeting(&self, ctx: &CapabilityContext) -> Result<Value, AdjutantError> {
        let events = self.upcoming_events(1, 5, ctx).await?;
        let now = Utc::now();

        for event in events {
            if event["is_all_day"].as_bool() == Some(true) {
                continue;
            }
            let Some(start) = event["start"].as_str().and_then(parse_event_time) else {
                continue;
            };
            if start > now {
                return Ok(event);
            }
        }
        Ok(Value::Null)
    }
}

#[async_trait]
impl CapabilityAdapter for CalendarCapability {
    fn name(&self) -> &str {
        "calendar"
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Value,
        ctx: &CapabilityContext,
    ) -> Result<ToolPayload, AdjutantError> {
        match action {
            "get_upcoming_events" => {
                let days = params["days"].as_i64().unwrap_or(DEFAULT_UPCOMING_DAYS).max(0);
                let max_results = params["max_results"]
                    .as_u64()
                    .unwrap_or(DEFAULT_UPCOMING_LIMIT);
                Ok(ToolPayload::Items(
                    self.upcoming_events(days, max_results, ctx).await?,
                ))
            }
            "get_today_schedule" => Ok(ToolPayload::Items(self.today_schedule().await?)),
            "check_availability" => {
                let date = params["date"]
                    .as_str()
                    .ok_or_else(|| AdjutantError::tool("missing required parameter 'date'"))?;
                let duration_minutes = params["duration_minutes"]
                    .as_i64()
                    .unwrap_or(DEFAULT_SLOT_MINUTES);
                Ok(ToolPayload::Record(
                    self.check_availability(date, duration_minutes).await?,
                ))
            }
            "get_next_meeting" => Ok(ToolPayload::Record(self.next_meeting(ctx).await?)),
            _ => Err(AdjutantError::ToolNotFound {
                capability: self.name().to_string(),
                action: action.to_string(),
            }),
        }
    }
}

/// One listing row. Detailed rows carry description and attendees.
fn event_row(event: &Value, detailed: bool) -> Value {
    let mut row = json!({
        "id": event["id"],
        "title": event["summary"].as_str().unwrap_or("(No title)"),
        "start": event_edge(&event["start"]),
        "end": event_edge(&event["end"]),
        "location": event["location"].as_str().unwrap_or(""),
        "is_all_day": event["start"].get("date").is_some(),
    });

    if detailed {
        let description = event["description"].as_str().unwrap_or("");
        row["description"] = Value::String(description.chars().take(DESCRIPTION_CHARS).collect());
        let attendees: Vec<Value> = event["attendees"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|a| a["email"].as_str())
                    .take(ATTENDEE_LIMIT)
                    .map(|email| Value::String(email.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        row["attendees"] = Value::Array(attendees);
    }

    row
}

/// Start or end of an event: the timestamp for timed events, the date for
/// all-day events.
fn event_edge(edge: &Value) -> Value {
    if let Some(date_time) = edge.get("dateTime") {
        return date_time.clone();
    }
    edge.get("date").cloned().unwrap_or(Value::Null)
}

/// Parses an event timestamp into UTC. Returns `None` on malformed input so
/// callers can skip the event rather than fail the whole listing.
fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn format_rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn day_at(date: NaiveDate, hour: u32) -> Result<DateTime<Utc>, AdjutantError> {
    date.and_hms_opt(hour, 0, 0)
        .map(|t| Utc.from_utc_datetime(&t))
        .ok_or_else(|| AdjutantError::Internal("failed to build day window".to_string()))
}

fn slot(start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "start": start.format("%H:%M").to_string(),
        "end": end.format("%H:%M").to_string(),
        "duration_minutes": (end - start).num_minutes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_capability(base_url: &str) -> CalendarCapability {
        CalendarCapability::new("test-token")
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn ctx() -> CapabilityContext {
        CapabilityContext::new("owner")
    }

    fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "summary": summary,
            "start": {"dateTime": start},
            "end": {"dateTime": end},
        })
    }

    #[tokio::test]
    async fn upcoming_events_builds_detailed_rows() {
        let server = MockServer::start().await;
        let long_description = "d".repeat(500);
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("maxResults", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "e1",
                        "summary": "Standup",
                        "start": {"dateTime": "2026-03-02T10:00:00Z"},
                        "end": {"dateTime": "2026-03-02T10:30:00Z"},
                        "location": "Room 4",
                        "description": long_description,
                        "attendees": [
                            {"email": "a@x.c"}, {"email": "b@x.c"}, {"email": "c@x.c"},
                            {"email": "d@x.c"}, {"email": "e@x.c"}, {"email": "f@x.c"}
                        ]
                    },
                    {
                        "id": "e2",
                        "start": {"date": "2026-03-03"},
                        "end": {"date": "2026-03-04"}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("get_upcoming_events", &json!({}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Items(rows) = payload else {
            panic!("expected items payload");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "Standup");
        assert_eq!(rows[0]["start"], "2026-03-02T10:00:00Z");
        assert_eq!(rows[0]["location"], "Room 4");
        assert_eq!(rows[0]["is_all_day"], false);
        assert_eq!(rows[0]["description"].as_str().unwrap().len(), 200);
        assert_eq!(rows[0]["attendees"].as_array().unwrap().len(), 5);

        assert_eq!(rows[1]["title"], "(No title)");
        assert_eq!(rows[1]["start"], "2026-03-03");
        assert_eq!(rows[1]["is_all_day"], true);
    }

    #[tokio::test]
    async fn today_schedule_rows_have_no_detail_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [timed_event("e1", "Standup", "2026-03-02T10:00:00Z", "2026-03-02T10:30:00Z")]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("get_today_schedule", &json!({}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Items(rows) = payload else {
            panic!("expected items payload");
        };
        assert!(rows[0].get("description").is_none());
        assert!(rows[0].get("attendees").is_none());
        assert_eq!(rows[0]["title"], "Standup");

        // Today's window asks for everything; no maxResults is sent.
        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "maxResults"));
    }

    #[tokio::test]
    async fn availability_with_no_events_is_the_whole_workday() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("timeMin", "2026-03-02T09:00:00Z"))
            .and(query_param("timeMax", "2026-03-02T18:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("check_availability", &json!({"date": "2026-03-02"}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Record(result) = payload else {
            panic!("expected record payload");
        };
        assert_eq!(result["date"], "2026-03-02");
        assert_eq!(
            result["free_slots"],
            json!([{"start": "09:00", "end": "18:00", "duration_minutes": 540}])
        );
        assert_eq!(result["total_free_minutes"], 540);
    }

    #[tokio::test]
    async fn availability_splits_around_busy_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    timed_event("e1", "Sync", "2026-03-02T10:00:00Z", "2026-03-02T11:00:00Z")
                ]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("check_availability", &json!({"date": "2026-03-02"}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Record(result) = payload else {
            panic!("expected record payload");
        };
        assert_eq!(
            result["free_slots"],
            json!([
                {"start": "09:00", "end": "10:00", "duration_minutes": 60},
                {"start": "11:00", "end": "18:00", "duration_minutes": 420}
            ])
        );
        assert_eq!(result["total_free_minutes"], 480);
    }

    #[tokio::test]
    async fn availability_skips_gaps_shorter_than_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    timed_event("e1", "Early", "2026-03-02T09:30:00Z", "2026-03-02T10:00:00Z")
                ]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke(
                "check_availability",
                &json!({"date": "2026-03-02", "duration_minutes": 60}),
                &ctx(),
            )
            .await
            .unwrap();

        let ToolPayload::Record(result) = payload else {
            panic!("expected record payload");
        };
        // The 09:00-09:30 gap cannot hold an hour, so only the tail remains.
        assert_eq!(
            result["free_slots"],
            json!([{"start": "10:00", "end": "18:00", "duration_minutes": 480}])
        );
    }

    #[tokio::test]
    async fn availability_ignores_all_day_events_and_sorts_busy_times() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    timed_event("late", "Late", "2026-03-02T15:00:00Z", "2026-03-02T16:00:00Z"),
                    {"id": "allday", "start": {"date": "2026-03-02"}, "end": {"date": "2026-03-03"}},
                    timed_event("early", "Early", "2026-03-02T09:00:00Z", "2026-03-02T10:00:00Z")
                ]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("check_availability", &json!({"date": "2026-03-02"}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Record(result) = payload else {
            panic!("expected record payload");
        };
        assert_eq!(
            result["free_slots"],
            json!([
                {"start": "10:00", "end": "15:00", "duration_minutes": 300},
                {"start": "16:00", "end": "18:00", "duration_minutes": 120}
            ])
        );
        assert_eq!(result["total_free_minutes"], 420);
    }

    #[tokio::test]
    async fn availability_rejects_malformed_dates() {
        let server = MockServer::start().await;
        let err = test_capability(&server.uri())
            .invoke("check_availability", &json!({"date": "03/02/2026"}), &ctx())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid date"), "got: {err}");
    }

    #[tokio::test]
    async fn next_meeting_picks_first_future_timed_event() {
        let server = MockServer::start().await;
        let past = format_rfc3339(Utc::now() - Duration::hours(2));
        let soon = format_rfc3339(Utc::now() + Duration::hours(2));
        let later = format_rfc3339(Utc::now() + Duration::hours(5));
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("maxResults", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "allday", "summary": "Offsite", "start": {"date": "2026-03-02"}, "end": {"date": "2026-03-03"}},
                    timed_event("past", "Earlier", &past, &past),
                    timed_event("soon", "Design review", &soon, &later),
                ]
            })))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("get_next_meeting", &json!({}), &ctx())
            .await
            .unwrap();

        let ToolPayload::Record(event) = payload else {
            panic!("expected record payload");
        };
        assert_eq!(event["id"], "soon");
        assert_eq!(event["title"], "Design review");
    }

    #[tokio::test]
    async fn next_meeting_is_null_when_nothing_upcoming() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let payload = test_capability(&server.uri())
            .invoke("get_next_meeting", &json!({}), &ctx())
            .await
            .unwrap();
        assert_eq!(payload, ToolPayload::Record(Value::Null));
    }

    #[tokio::test]
    async fn unknown_action_is_tool_not_found() {
        let server = MockServer::start().await;
        let err = test_capability(&server.uri())
            .invoke("create_event", &json!({}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AdjutantError::ToolNotFound { .. }));
        assert_eq!(err.to_string(), "tool not found: calendar/create_event");
    }
}
