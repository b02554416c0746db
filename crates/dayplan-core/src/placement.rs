//! Greedy task placement into open slots.
//!
//! Tasks are placed in their given list order -- no reordering, no priority
//! weighting, no optimality search. A non-splittable task needs a single
//! slot that covers it together with any break time the active strategy
//! interleaves; a splittable task walks the slot list emitting fragments of
//! at least the minimum chunk size, with the unplaced remainder reported
//! back instead of failing the whole task.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::breaks::BreakStrategy;
use crate::slots::OpenSlot;
use crate::task::{Task, MIN_TASK_MINUTES};

/// One concrete entry of a proposed day plan: a task occurrence, a task
/// fragment, or a rest break.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledItem {
    /// Display name
    pub name: String,
    /// Start instant
    pub start: DateTime<Utc>,
    /// End instant
    pub end: DateTime<Utc>,
    /// Duration of this occurrence in minutes
    pub minutes: i64,
    /// Whether this entry is a rest break
    pub is_break: bool,
    /// Whether this entry is one fragment of a split task
    pub is_fragment: bool,
    /// Originating task, absent for breaks
    pub task_id: Option<String>,
}

impl ScheduledItem {
    /// A whole task occurrence.
    pub fn occurrence(task: &Task, start: DateTime<Utc>) -> Self {
        Self {
            name: task.name.clone(),
            start,
            end: start + Duration::minutes(task.duration_minutes),
            minutes: task.duration_minutes,
            is_break: false,
            is_fragment: false,
            task_id: Some(task.id.clone()),
        }
    }

    /// One fragment of a split or chunked task.
    pub fn fragment(task: &Task, start: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            name: task.name.clone(),
            start,
            end: start + Duration::minutes(minutes),
            minutes,
            is_break: false,
            is_fragment: true,
            task_id: Some(task.id.clone()),
        }
    }

    /// A rest break.
    pub fn rest(label: &str, start: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            name: label.to_string(),
            start,
            end: start + Duration::minutes(minutes),
            minutes,
            is_break: true,
            is_fragment: false,
            task_id: None,
        }
    }
}

/// Result of one placement run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Items in chronological emission order
    pub scheduled: Vec<ScheduledItem>,
    /// Tasks (or split-task remainders) that found no room
    pub unscheduled: Vec<Task>,
}

/// Segment of an interleaved single-slot plan.
enum Segment {
    Work(i64),
    Rest(i64),
}

/// Greedy placement engine, parameterized by the active break strategy.
///
/// The engine owns the per-run counters: completed work chunks (drives the
/// pomodoro long-break cadence across tasks) and work units since the last
/// inserted break (drives interval strategies). A break that does not fit
/// the current slot is skipped without resetting the unit counter.
pub struct PlacementEngine {
    strategy: BreakStrategy,
    min_chunk: i64,
    chunks_done: u32,
    units_since_break: u32,
}

impl PlacementEngine {
    /// Create an engine for one scheduling run.
    pub fn new(strategy: BreakStrategy) -> Self {
        Self {
            strategy,
            min_chunk: MIN_TASK_MINUTES,
            chunks_done: 0,
            units_since_break: 0,
        }
    }

    /// Place `tasks` into `slots`, consuming slot capacity in place.
    ///
    /// Slots below the minimum chunk size are dropped from the list as they
    /// become exhausted. The caller passes non-completed tasks only.
    pub fn place(&mut self, tasks: &[Task], slots: &mut Vec<OpenSlot>) -> PlacementOutcome {
        slots.retain(|s| s.minutes() >= self.min_chunk);

        let mut outcome = PlacementOutcome::default();
        for task in tasks {
            if task.splittable {
                self.place_split(task, slots, &mut outcome);
            } else {
                self.place_whole(task, slots, &mut outcome);
            }
        }
        outcome
    }

    /// Place a non-splittable task into the first slot that can hold it
    /// together with any interleaved breaks.
    fn place_whole(&mut self, task: &Task, slots: &mut Vec<OpenSlot>, outcome: &mut PlacementOutcome) {
        for i in 0..slots.len() {
            let capacity = slots[i].minutes();
            if capacity < task.duration_minutes {
                continue;
            }

            let consumed = match self.strategy.work_chunk() {
                Some(chunk) if task.duration_minutes > chunk => {
                    let (segments, span) = self.interleave_plan(task.duration_minutes);
                    if span > capacity {
                        continue;
                    }
                    self.emit_segments(task, slots[i].start, &segments, outcome);
                    span
                }
                _ => {
                    outcome.scheduled.push(ScheduledItem::occurrence(task, slots[i].start));
                    let mut consumed = task.duration_minutes;
                    // Whole tasks count as one work unit for interval strategies.
                    self.units_since_break += 1;
                    if let Some(rest) = self.strategy.break_after(self.chunks_done, self.units_since_break, 0) {
                        if capacity - consumed >= rest {
                            let start = slots[i].start + Duration::minutes(consumed);
                            outcome
                                .scheduled
                                .push(ScheduledItem::rest(self.strategy.break_label(rest), start, rest));
                            self.units_since_break = 0;
                            consumed += rest;
                        }
                    }
                    consumed
                }
            };

            if capacity - consumed < self.min_chunk {
                slots.remove(i);
            } else {
                slots[i].start += Duration::minutes(consumed);
            }
            return;
        }

        outcome.unscheduled.push(task.clone());
    }

    /// Plan the chunk/break interleave of a long non-splittable task,
    /// without committing counters. Returns the segments and their total
    /// span in minutes.
    fn interleave_plan(&self, duration: i64) -> (Vec<Segment>, i64) {
        let chunk_size = match self.strategy.work_chunk() {
            Some(c) => c,
            None => return (vec![Segment::Work(duration)], duration),
        };

        let mut segments = Vec::new();
        let mut span = 0;
        let mut remaining = duration;
        let mut chunks_done = self.chunks_done;

        while remaining > 0 {
            let work = chunk_size.min(remaining);
            segments.push(Segment::Work(work));
            span += work;
            remaining -= work;
            chunks_done += 1;

            if let Some(rest) = self.strategy.break_after(chunks_done, 0, remaining) {
                segments.push(Segment::Rest(rest));
                span += rest;
            }
        }

        (segments, span)
    }

    /// Emit a planned interleave starting at `start`, committing the chunk
    /// counter as fragments are produced.
    fn emit_segments(
        &mut self,
        task: &Task,
        start: DateTime<Utc>,
        segments: &[Segment],
        outcome: &mut PlacementOutcome,
    ) {
        let mut cursor = start;
        for segment in segments {
            match segment {
                Segment::Work(minutes) => {
                    outcome.scheduled.push(ScheduledItem::fragment(task, cursor, *minutes));
                    cursor += Duration::minutes(*minutes);
                    self.chunks_done += 1;
                    self.units_since_break += 1;
                }
                Segment::Rest(minutes) => {
                    outcome.scheduled.push(ScheduledItem::rest(
                        self.strategy.break_label(*minutes),
                        cursor,
                        *minutes,
                    ));
                    cursor += Duration::minutes(*minutes);
                    self.units_since_break = 0;
                }
            }
        }
    }

    /// Place a splittable task across as many slots as it needs.
    fn place_split(&mut self, task: &Task, slots: &mut Vec<OpenSlot>, outcome: &mut PlacementOutcome) {
        let mut remaining = task.duration_minutes;
        let mut i = 0;

        while remaining >= self.min_chunk && i < slots.len() {
            if slots[i].minutes() < self.min_chunk {
                slots.remove(i);
                continue;
            }

            match self.strategy.work_chunk() {
                Some(chunk_size) => {
                    // Chunked walk within this slot.
                    while remaining >= self.min_chunk {
                        let avail = slots[i].minutes();
                        let work = chunk_size.min(avail).min(remaining);
                        if work < self.min_chunk {
                            break;
                        }

                        outcome.scheduled.push(ScheduledItem::fragment(task, slots[i].start, work));
                        slots[i].start += Duration::minutes(work);
                        remaining -= work;
                        self.chunks_done += 1;
                        self.units_since_break += 1;

                        if let Some(rest) =
                            self.strategy.break_after(self.chunks_done, self.units_since_break, remaining)
                        {
                            if slots[i].minutes() >= rest {
                                outcome.scheduled.push(ScheduledItem::rest(
                                    self.strategy.break_label(rest),
                                    slots[i].start,
                                    rest,
                                ));
                                slots[i].start += Duration::minutes(rest);
                                self.units_since_break = 0;
                            }
                        }
                    }
                }
                None => {
                    let work = slots[i].minutes().min(remaining);
                    if work >= self.min_chunk {
                        outcome.scheduled.push(ScheduledItem::fragment(task, slots[i].start, work));
                        slots[i].start += Duration::minutes(work);
                        remaining -= work;
                        self.units_since_break += 1;

                        if let Some(rest) =
                            self.strategy.break_after(self.chunks_done, self.units_since_break, 0)
                        {
                            if slots[i].minutes() >= rest {
                                outcome.scheduled.push(ScheduledItem::rest(
                                    self.strategy.break_label(rest),
                                    slots[i].start,
                                    rest,
                                ));
                                slots[i].start += Duration::minutes(rest);
                                self.units_since_break = 0;
                            }
                        }
                    }
                }
            }

            if slots[i].minutes() < self.min_chunk {
                slots.remove(i);
            } else {
                i += 1;
            }
        }

        if remaining > 0 {
            outcome.unscheduled.push(task.with_remaining(remaining));
        }
    }
}
