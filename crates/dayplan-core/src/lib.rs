//! # Dayplan Core Library
//!
//! This library proposes a time-blocked agenda for the rest of a day:
//! pending tasks are fitted greedily into the free gaps between fixed
//! calendar commitments, with optional rest breaks inserted by one of
//! several interchangeable strategies. One strategy is chosen adaptively
//! by a small tabular Q-learning policy trained from user feedback and
//! task-completion outcomes.
//!
//! ## Architecture
//!
//! - **Slots**: free-slot extraction over `[now, end of day]`
//! - **Placement**: greedy single-pass engine with task splitting and
//!   interleaved break insertion
//! - **Breaks**: pomodoro, eye-health, and interval-based strategies
//!   behind one uniform capability
//! - **Policy**: epsilon-greedy Q-learning over a six-action catalogue
//! - **Storage**: key-value persistence (in-memory or SQLite) for tasks,
//!   plan snapshots, and the learned value table
//! - **Calendar**: best-effort Google Calendar read/write collaborator
//!
//! ## Key Components
//!
//! - [`Planner`]: orchestrates one scheduling run end to end
//! - [`PlacementEngine`]: the core placement algorithm
//! - [`BreakAgent`]: the reinforcement-learning policy
//! - [`CalendarClient`]: calendar collaborator, always degradable

pub mod breaks;
pub mod calendar;
pub mod error;
pub mod placement;
pub mod planner;
pub mod policy;
pub mod slots;
pub mod storage;
pub mod task;

pub use breaks::{BreakConfig, BreakStrategy, EyeHealthParams, PlanMode, PomodoroParams};
pub use calendar::{CalendarClient, CalendarEvent, PushSummary, TokenProvider};
pub use error::{
    CalendarError, CoreError, CredentialError, PolicyError, StorageError, ValidationError,
};
pub use placement::{PlacementEngine, PlacementOutcome, ScheduledItem};
pub use planner::{DayPlan, EpisodeReport, Planner};
pub use policy::{BreakAction, BreakAgent, Decision, Feedback, PolicyState};
pub use slots::{end_of_day, find_open_slots, BusyInterval, OpenSlot};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use task::{Task, MIN_TASK_MINUTES};
