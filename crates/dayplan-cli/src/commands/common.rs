//! Shared helpers for CLI commands.

use chrono::{DateTime, Timelike, Utc};
use clap::ValueEnum;
use dayplan_core::{PlanMode, ScheduledItem, SqliteStore};

/// Planning mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Normal,
    Pomodoro,
    EyeHealth,
    Adaptive,
}

impl From<ModeArg> for PlanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => PlanMode::Normal,
            ModeArg::Pomodoro => PlanMode::Pomodoro,
            ModeArg::EyeHealth => PlanMode::EyeHealth,
            ModeArg::Adaptive => PlanMode::Adaptive,
        }
    }
}

/// Open the default SQLite store.
pub fn open_store() -> Result<SqliteStore, Box<dyn std::error::Error>> {
    Ok(SqliteStore::open()?)
}

/// Resolve the run's reference instant: today's date at `HH:MM`, or the
/// current minute when no start time is given.
pub fn resolve_start(start: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let now = Utc::now()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(Utc::now);

    let Some(start) = start else {
        return Ok(now);
    };

    let (hours, minutes) = start
        .split_once(':')
        .ok_or_else(|| format!("invalid start time '{start}', expected HH:MM"))?;
    let hours: u32 = hours.parse()?;
    let minutes: u32 = minutes.parse()?;

    now.with_hour(hours)
        .and_then(|t| t.with_minute(minutes))
        .ok_or_else(|| format!("invalid start time '{start}'").into())
}

/// One printable line per scheduled item.
pub fn format_item(item: &ScheduledItem) -> String {
    let marker = if item.is_break {
        " [break]"
    } else if item.is_fragment {
        " [part]"
    } else {
        ""
    };
    format!(
        "{} - {}  {} ({} min){}",
        item.start.format("%H:%M"),
        item.end.format("%H:%M"),
        item.name,
        item.minutes,
        marker
    )
}
