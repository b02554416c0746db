//! Day-plan orchestration.
//!
//! Ties the pieces together for one scheduling run: filter pending tasks,
//! resolve the active break strategy (configured mode or RL decision),
//! extract free slots, run the placement engine, and persist the result.
//! Also owns the feedback episode that closes the RL loop.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::breaks::{BreakStrategy, PlanMode};
use crate::error::{CoreError, PolicyError};
use crate::placement::{PlacementEngine, ScheduledItem};
use crate::policy::{BreakAction, BreakAgent, Decision, Feedback, PolicyState};
use crate::slots::{end_of_day, find_open_slots, BusyInterval};
use crate::storage::schedule::{save_last_start, save_plan, PlanSnapshot};
use crate::storage::{keys, tasks, Config, KeyValueStore};
use crate::task::Task;

/// A proposed agenda for the rest of the day.
#[derive(Debug, Clone)]
pub struct DayPlan {
    pub scheduled: Vec<ScheduledItem>,
    pub unscheduled: Vec<Task>,
    /// The RL decision behind the run, when the adaptive mode was active.
    pub decision: Option<Decision>,
}

/// RL decision awaiting user feedback, persisted between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingEpisode {
    state: PolicyState,
    action: BreakAction,
    scheduled_count: usize,
    unscheduled_count: usize,
}

/// Result of applying one feedback episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeReport {
    pub reward: f64,
    pub exploration_rate: f64,
    pub episodes: u64,
}

/// Schedule builder entry point, owning the storage handle for the
/// session (single writer assumed).
pub struct Planner<S: KeyValueStore> {
    store: S,
    config: Config,
    seed: Option<u64>,
}

impl<S: KeyValueStore> Planner<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            config,
            seed: None,
        }
    }

    /// Fix the RL exploration seed (reproducible runs).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the plan for `[now, end of day]` around the given busy
    /// intervals and persist the snapshot under the run's start time.
    pub fn plan(
        &mut self,
        now: DateTime<Utc>,
        busy: &[BusyInterval],
        mode: Option<PlanMode>,
    ) -> Result<DayPlan, CoreError> {
        let mode = mode.unwrap_or(self.config.default_mode);
        let all_tasks = tasks::load_tasks(&self.store)?;
        let pending: Vec<Task> = all_tasks.into_iter().filter(|t| !t.completed).collect();

        let (strategy, decision) = self.resolve_strategy(now, &pending, busy, mode);

        let mut slots = find_open_slots(now, end_of_day(now), busy);
        let mut engine = PlacementEngine::new(strategy);
        let outcome = engine.place(&pending, &mut slots);

        let snapshot = PlanSnapshot {
            scheduled: outcome.scheduled.clone(),
            unscheduled: outcome.unscheduled.clone(),
        };
        save_plan(&mut self.store, now, &snapshot)?;
        save_last_start(&mut self.store, now)?;

        if let Some(decision) = &decision {
            let episode = PendingEpisode {
                state: decision.state,
                action: decision.action,
                scheduled_count: outcome.scheduled.iter().filter(|i| !i.is_break).count(),
                unscheduled_count: outcome.unscheduled.len(),
            };
            self.store
                .set(keys::PENDING_EPISODE, &serde_json::to_string(&episode)?)?;
        }

        Ok(DayPlan {
            scheduled: outcome.scheduled,
            unscheduled: outcome.unscheduled,
            decision,
        })
    }

    /// Resolve the run's strategy. The adaptive path consults the RL
    /// agent; any failure there falls back to the traditional no-breaks
    /// path without blocking plan generation.
    fn resolve_strategy(
        &mut self,
        now: DateTime<Utc>,
        pending: &[Task],
        busy: &[BusyInterval],
        mode: PlanMode,
    ) -> (BreakStrategy, Option<Decision>) {
        match mode {
            PlanMode::Normal => (BreakStrategy::None, None),
            PlanMode::Pomodoro => (
                BreakStrategy::Pomodoro(self.config.schedule.pomodoro_params()),
                None,
            ),
            PlanMode::EyeHealth => (
                BreakStrategy::EyeHealth(self.config.schedule.eye_params()),
                None,
            ),
            PlanMode::Adaptive => match BreakAgent::load(&self.store, self.seed) {
                Ok(mut agent) => {
                    let state = PolicyState::observe(now, pending, !busy.is_empty(), mode);
                    let decision = agent.choose(&state);
                    tracing::debug!(
                        action = decision.action.key(),
                        explored = decision.explored,
                        "adaptive strategy selected"
                    );
                    let config = decision.action.config(now.hour());
                    (BreakStrategy::Interval(config), Some(decision))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "RL policy unavailable, falling back to no breaks");
                    (BreakStrategy::None, None)
                }
            },
        }
    }

    /// Close the loop on the most recent adaptive run: compute the
    /// reward, apply the Q-update, decay exploration, and write the
    /// snapshot back.
    pub fn record_feedback(
        &mut self,
        now: DateTime<Utc>,
        busy: &[BusyInterval],
        feedback: Feedback,
        completed_count: usize,
        mode: Option<PlanMode>,
    ) -> Result<EpisodeReport, CoreError> {
        let episode: PendingEpisode = match self.store.get(keys::PENDING_EPISODE)? {
            None => return Err(PolicyError::NoPendingDecision.into()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(episode) => episode,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt pending episode, dropping it");
                    self.store.remove(keys::PENDING_EPISODE)?;
                    return Err(PolicyError::NoPendingDecision.into());
                }
            },
        };

        let mode = mode.unwrap_or(self.config.default_mode);
        let all_tasks = tasks::load_tasks(&self.store)?;
        let pending: Vec<Task> = all_tasks.into_iter().filter(|t| !t.completed).collect();
        let next_state = PolicyState::observe(now, &pending, !busy.is_empty(), mode);

        let completed = completed_count.min(episode.scheduled_count);
        let reward = BreakAgent::reward(
            feedback,
            episode.scheduled_count,
            completed,
            episode.unscheduled_count,
        );

        let mut agent = BreakAgent::load(&self.store, self.seed)?;
        agent.update(&episode.state, episode.action, reward, &next_state);
        agent.save(&mut self.store)?;
        self.store.remove(keys::PENDING_EPISODE)?;

        Ok(EpisodeReport {
            reward,
            exploration_rate: agent.exploration_rate(),
            episodes: agent.episodes(),
        })
    }
}
