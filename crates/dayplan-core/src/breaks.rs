//! Break-insertion strategies.
//!
//! A strategy is a pure rule deciding, after each completed work unit,
//! whether to insert a rest break and how long it should be. Three
//! families exist:
//! - fixed periodic with a work-chunk size (pomodoro, eye-health), where
//!   long work is cut into chunks and breaks sit between chunks;
//! - interval-based (the RL catalogue), where whole units (tasks or slot
//!   chunks) are counted and a break follows every N units;
//! - no breaks at all.
//!
//! The placement engine never branches on the concrete family; it only
//! calls [`BreakStrategy::work_chunk`] and [`BreakStrategy::break_after`].

use serde::{Deserialize, Serialize};

/// Planning mode selected by the user (or by configuration default).
///
/// `Adaptive` delegates the strategy choice to the RL policy; the other
/// modes map directly onto a fixed strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// No breaks inserted.
    #[default]
    Normal,
    /// Fixed pomodoro cadence.
    Pomodoro,
    /// Fixed eye-health cadence.
    EyeHealth,
    /// Strategy chosen by the RL policy.
    Adaptive,
}

impl PlanMode {
    /// Discrete code used inside the RL state tuple. Only the non-adaptive
    /// modes are distinguished; the adaptive mode reads as "normal".
    pub fn state_code(&self) -> u8 {
        match self {
            PlanMode::Normal | PlanMode::Adaptive => 0,
            PlanMode::Pomodoro => 1,
            PlanMode::EyeHealth => 2,
        }
    }
}

/// Parameters for the pomodoro-style fixed periodic strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomodoroParams {
    /// Work chunk size in minutes
    pub work_minutes: i64,
    /// Short break length in minutes
    pub short_break: i64,
    /// Long break length in minutes
    pub long_break: i64,
    /// Every Nth completed chunk earns the long break
    pub long_every: u32,
}

impl Default for PomodoroParams {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break: 5,
            long_break: 15,
            long_every: 4,
        }
    }
}

/// Parameters for the eye-health fixed periodic strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EyeHealthParams {
    /// Work chunk size in minutes
    pub work_minutes: i64,
    /// Uniform break length in minutes
    pub break_minutes: i64,
}

impl Default for EyeHealthParams {
    fn default() -> Self {
        Self {
            work_minutes: 20,
            break_minutes: 5,
        }
    }
}

/// Interval-based break configuration: a break of `break_minutes` after
/// every `interval` completed work units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakConfig {
    pub break_minutes: i64,
    pub interval: u32,
}

impl BreakConfig {
    /// 5-minute breaks every 2 units.
    pub fn short_frequent() -> Self {
        Self { break_minutes: 5, interval: 2 }
    }

    /// 10-minute breaks every 3 units.
    pub fn short_balanced() -> Self {
        Self { break_minutes: 10, interval: 3 }
    }

    /// 15-minute breaks every 3 units.
    pub fn long_balanced() -> Self {
        Self { break_minutes: 15, interval: 3 }
    }

    /// 20-minute breaks every 4 units.
    pub fn long_infrequent() -> Self {
        Self { break_minutes: 20, interval: 4 }
    }

    /// No breaks: the interval is never reached.
    pub fn no_breaks() -> Self {
        Self { break_minutes: 0, interval: u32::MAX }
    }

    /// Time-of-day dependent configuration: shorter breaks while energy is
    /// high in the morning, longer ones towards the evening.
    pub fn adaptive_for_hour(hour: u32) -> Self {
        match hour {
            9..=11 => Self { break_minutes: 5, interval: 4 },
            12..=16 => Self { break_minutes: 15, interval: 3 },
            17..=21 => Self { break_minutes: 20, interval: 2 },
            _ => Self { break_minutes: 10, interval: 3 },
        }
    }

    fn is_none(&self) -> bool {
        self.break_minutes <= 0
    }
}

/// Active break strategy for one scheduling run. Selected statically from
/// configuration or dynamically by the RL policy, then held constant for
/// the whole run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BreakStrategy {
    /// No breaks inserted.
    None,
    /// 25-minute chunks, 5-minute breaks, 15-minute long break every 4th.
    Pomodoro(PomodoroParams),
    /// 20-minute chunks with uniform 5-minute breaks.
    EyeHealth(EyeHealthParams),
    /// Break every N work units (RL catalogue and adaptive variant).
    Interval(BreakConfig),
}

impl BreakStrategy {
    /// Work chunk size for the fixed periodic families. Interval-based
    /// strategies do not cut work into chunks.
    pub fn work_chunk(&self) -> Option<i64> {
        match self {
            BreakStrategy::Pomodoro(p) => Some(p.work_minutes),
            BreakStrategy::EyeHealth(p) => Some(p.work_minutes),
            BreakStrategy::None | BreakStrategy::Interval(_) => None,
        }
    }

    /// Decide whether a break follows the work unit just completed.
    ///
    /// `chunks_done` counts completed chunks across the whole run (drives
    /// the long-break cadence), `units_since_break` counts units since the
    /// last inserted break (drives interval strategies), and
    /// `remaining_minutes` is what is left of the current task. Fixed
    /// periodic breaks are only due while at least one full work chunk of
    /// the task remains.
    pub fn break_after(
        &self,
        chunks_done: u32,
        units_since_break: u32,
        remaining_minutes: i64,
    ) -> Option<i64> {
        match self {
            BreakStrategy::None => None,
            BreakStrategy::Pomodoro(p) => {
                if remaining_minutes < p.work_minutes {
                    return None;
                }
                if chunks_done % p.long_every == 0 {
                    Some(p.long_break)
                } else {
                    Some(p.short_break)
                }
            }
            BreakStrategy::EyeHealth(p) => {
                if remaining_minutes < p.work_minutes {
                    return None;
                }
                Some(p.break_minutes)
            }
            BreakStrategy::Interval(config) => {
                if config.is_none() || units_since_break < config.interval {
                    None
                } else {
                    Some(config.break_minutes)
                }
            }
        }
    }

    /// Display name for a break of the given length under this strategy.
    pub fn break_label(&self, minutes: i64) -> &'static str {
        match self {
            BreakStrategy::Pomodoro(p) if minutes == p.long_break => "Long Pomodoro Break",
            BreakStrategy::Pomodoro(_) => "Pomodoro Break",
            BreakStrategy::EyeHealth(_) => "Eye Health Break",
            _ => "Break",
        }
    }
}
