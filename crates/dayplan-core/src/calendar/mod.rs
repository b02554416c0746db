//! Google Calendar collaborator: credential lookup, event parsing, and
//! the best-effort read/write client.
//!
//! The core never requires the calendar: a failed read degrades to "no
//! fixed commitments today", and writes are per-item with success and
//! failure counted rather than aborting the batch.

mod auth;
mod client;

pub use auth::{clear_token, store_token, KeyringTokenProvider, StaticTokenProvider, TokenProvider};
pub use client::{CalendarClient, PushSummary, DEFAULT_BASE_URL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slots::BusyInterval;

/// A timed event fetched from the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarEvent {
    /// The busy interval this event occupies.
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Parse an events-list response body, keeping only events with concrete
/// `start.dateTime`/`end.dateTime` (all-day events carry `date` instead
/// and do not block time).
pub fn parse_events(body: &serde_json::Value) -> Vec<CalendarEvent> {
    let Some(items) = body["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let start = item["start"]["dateTime"].as_str()?;
            let end = item["end"]["dateTime"].as_str()?;
            let start = DateTime::parse_from_rfc3339(start).ok()?.with_timezone(&Utc);
            let end = DateTime::parse_from_rfc3339(end).ok()?.with_timezone(&Utc);
            if start >= end {
                return None;
            }
            Some(CalendarEvent {
                summary: item["summary"].as_str().unwrap_or_default().to_string(),
                start,
                end,
            })
        })
        .collect()
}

/// Convert events to busy intervals sorted by start time.
pub fn to_busy_intervals(events: &[CalendarEvent]) -> Vec<BusyInterval> {
    let mut intervals: Vec<BusyInterval> = events.iter().map(|e| e.busy_interval()).collect();
    intervals.sort_by_key(|i| i.start);
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_timed_events_only() {
        let body = json!({
            "items": [
                {
                    "summary": "Standup",
                    "start": {"dateTime": "2025-03-10T09:00:00Z"},
                    "end": {"dateTime": "2025-03-10T09:15:00Z"}
                },
                {
                    "summary": "Company holiday",
                    "start": {"date": "2025-03-10"},
                    "end": {"date": "2025-03-11"}
                },
                {
                    "summary": "Broken",
                    "start": {"dateTime": "not a time"},
                    "end": {"dateTime": "2025-03-10T10:00:00Z"}
                }
            ]
        });

        let events = parse_events(&body);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Standup");
    }

    #[test]
    fn test_parse_rejects_inverted_ranges() {
        let body = json!({
            "items": [{
                "summary": "Inverted",
                "start": {"dateTime": "2025-03-10T10:00:00Z"},
                "end": {"dateTime": "2025-03-10T09:00:00Z"}
            }]
        });
        assert!(parse_events(&body).is_empty());
    }

    #[test]
    fn test_parse_missing_items_is_empty() {
        assert!(parse_events(&json!({})).is_empty());
        assert!(parse_events(&json!({"items": "nope"})).is_empty());
    }

    #[test]
    fn test_busy_intervals_sorted() {
        let body = json!({
            "items": [
                {
                    "summary": "Later",
                    "start": {"dateTime": "2025-03-10T14:00:00Z"},
                    "end": {"dateTime": "2025-03-10T15:00:00Z"}
                },
                {
                    "summary": "Earlier",
                    "start": {"dateTime": "2025-03-10T09:00:00Z"},
                    "end": {"dateTime": "2025-03-10T10:00:00Z"}
                }
            ]
        });

        let intervals = to_busy_intervals(&parse_events(&body));
        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].start < intervals[1].start);
    }
}
