//! Calendar API client.
//!
//! Reads today's timed events and writes a generated plan back as
//! individual events, breaks color-coded. Both directions are
//! best-effort: reads degrade to an empty day, writes tally per-item
//! success and failure without aborting.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use super::{parse_events, CalendarEvent, TokenProvider};
use crate::error::CalendarError;
use crate::placement::ScheduledItem;
use crate::slots::{end_of_day, BusyInterval};

/// Production Google Calendar v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Color id for break events, rendered distinctly in the calendar UI.
const BREAK_COLOR_ID: &str = "8";

/// Per-item result counts for a plan push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub created: usize,
    pub failed: usize,
}

/// Calendar read/write client.
pub struct CalendarClient {
    http: reqwest::Client,
    tokens: Box<dyn TokenProvider>,
    base_url: String,
    calendar_id: String,
}

impl CalendarClient {
    /// Client for the user's primary calendar.
    pub fn new(tokens: Box<dyn TokenProvider>) -> Self {
        Self::for_calendar(tokens, "primary")
    }

    /// Client for an explicit calendar id.
    pub fn for_calendar(tokens: Box<dyn TokenProvider>, calendar_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// List today's timed events, ordered by start time, restricted to
    /// `[now, end of day]`.
    pub async fn fetch_today_events(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let token = self.tokens.access_token()?;
        let response = self
            .http
            .get(self.events_url())
            .query(&[
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("timeMin", now.to_rfc3339_opts(SecondsFormat::Secs, true)),
                (
                    "timeMax",
                    end_of_day(now).to_rfc3339_opts(SecondsFormat::Millis, true),
                ),
            ])
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CalendarError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        Ok(parse_events(&body))
    }

    /// Today's commitments as busy intervals, degrading to an empty day
    /// when the calendar cannot be read.
    pub async fn fetch_busy_or_empty(&self, now: DateTime<Utc>) -> Vec<BusyInterval> {
        match self.fetch_today_events(now).await {
            Ok(events) => super::to_busy_intervals(&events),
            Err(e) => {
                tracing::warn!(error = %e, "calendar read failed, planning without commitments");
                Vec::new()
            }
        }
    }

    /// Create one calendar event per scheduled item. Failures are counted
    /// per item; the batch always runs to the end.
    pub async fn push_plan(&self, items: &[ScheduledItem]) -> Result<PushSummary, CalendarError> {
        let token = self.tokens.access_token()?;
        let url = self.events_url();

        let mut summary = PushSummary::default();
        for item in items {
            let result = self
                .http
                .post(&url)
                .bearer_auth(&token)
                .json(&event_body(item))
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => summary.created += 1,
                Ok(response) => {
                    tracing::warn!(status = %response.status(), name = %item.name, "event create failed");
                    summary.failed += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, name = %item.name, "event create failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Event payload for one scheduled item. Breaks carry a distinguishing
/// summary prefix and color.
pub fn event_body(item: &ScheduledItem) -> serde_json::Value {
    let mut body = json!({
        "summary": if item.is_break {
            format!("\u{1f7e6} {}", item.name)
        } else {
            item.name.clone()
        },
        "start": {"dateTime": item.start.to_rfc3339_opts(SecondsFormat::Secs, true)},
        "end": {"dateTime": item.end.to_rfc3339_opts(SecondsFormat::Secs, true)},
    });

    if item.is_break {
        body["colorId"] = json!(BREAK_COLOR_ID);
    }

    body
}
