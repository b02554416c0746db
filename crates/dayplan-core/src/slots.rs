//! Free-slot extraction for the remainder of a day.
//!
//! Given a reference instant and the day's fixed commitments, computes the
//! ordered list of open intervals the placement engine can fill. The sweep
//! keeps a cursor that never moves backward, so overlapping or out-of-order
//! busy intervals are tolerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An externally fixed commitment occupying part of the day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Create a busy interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }
}

/// A contiguous interval of free time. Mutated in place by the placement
/// engine as it consumes capacity from the front.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl OpenSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Remaining capacity in whole minutes.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// End-of-day boundary: 23:59:59.999 on the same calendar day as `now`.
pub fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}

/// Compute the open slots covering the complement of `busy` within
/// `[now, day_end]`.
///
/// `busy` should be sorted by start time; unsorted or overlapping input is
/// tolerated because the cursor only ever advances. Intervals that end
/// before `now` are skipped, and an interval running past `day_end`
/// suppresses the trailing slot.
pub fn find_open_slots(
    now: DateTime<Utc>,
    day_end: DateTime<Utc>,
    busy: &[BusyInterval],
) -> Vec<OpenSlot> {
    let mut slots = Vec::new();
    let mut cursor = now;

    for interval in busy {
        if interval.start > cursor {
            let gap_end = interval.start.min(day_end);
            if gap_end > cursor {
                slots.push(OpenSlot::new(cursor, gap_end));
            }
        }
        if interval.end > cursor {
            cursor = interval.end;
        }
    }

    if cursor < day_end {
        slots.push(OpenSlot::new(cursor, day_end));
    }

    slots
}
