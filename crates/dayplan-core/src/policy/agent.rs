//! Tabular Q-learning agent for break-strategy selection.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::breaks::{BreakConfig, PlanMode};
use crate::error::StorageError;
use crate::storage::{keys, KeyValueStore};
use crate::task::Task;

/// How much a single update moves the stored value.
pub const LEARNING_RATE: f64 = 0.1;
/// Weight of future rewards in the update target.
pub const DISCOUNT_FACTOR: f64 = 0.9;
/// Initial probability of exploring a random action.
pub const INITIAL_EXPLORATION: f64 = 0.3;
/// Exploration never decays below this floor.
pub const MIN_EXPLORATION: f64 = 0.05;
/// Multiplicative exploration decay per episode.
pub const EXPLORATION_DECAY: f64 = 0.995;

/// The six break configurations the agent chooses between. Catalogue
/// order is fixed; ties in value break towards the earlier entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreakAction {
    /// 5-minute breaks every 2 units
    ShortFrequent,
    /// 10-minute breaks every 3 units
    ShortBalanced,
    /// 15-minute breaks every 3 units
    LongBalanced,
    /// 20-minute breaks every 4 units
    LongInfrequent,
    /// No breaks at all
    NoBreaks,
    /// Time-of-day dependent configuration
    Adaptive,
}

impl BreakAction {
    /// All actions in catalogue order.
    pub const CATALOGUE: [BreakAction; 6] = [
        BreakAction::ShortFrequent,
        BreakAction::ShortBalanced,
        BreakAction::LongBalanced,
        BreakAction::LongInfrequent,
        BreakAction::NoBreaks,
        BreakAction::Adaptive,
    ];

    /// Stable identifier used inside Q-table keys.
    pub fn key(&self) -> &'static str {
        match self {
            BreakAction::ShortFrequent => "short_frequent",
            BreakAction::ShortBalanced => "short_balanced",
            BreakAction::LongBalanced => "long_balanced",
            BreakAction::LongInfrequent => "long_infrequent",
            BreakAction::NoBreaks => "no_breaks",
            BreakAction::Adaptive => "adaptive_breaks",
        }
    }

    /// Resolve the action to a concrete break configuration. The adaptive
    /// action depends on the hour of the run's reference instant; all
    /// others are fixed.
    pub fn config(&self, hour: u32) -> BreakConfig {
        match self {
            BreakAction::ShortFrequent => BreakConfig::short_frequent(),
            BreakAction::ShortBalanced => BreakConfig::short_balanced(),
            BreakAction::LongBalanced => BreakConfig::long_balanced(),
            BreakAction::LongInfrequent => BreakConfig::long_infrequent(),
            BreakAction::NoBreaks => BreakConfig::no_breaks(),
            BreakAction::Adaptive => BreakConfig::adaptive_for_hour(hour),
        }
    }
}

/// User rating of a generated plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Good,
    Okay,
    Bad,
}

impl Feedback {
    fn points(&self) -> f64 {
        match self {
            Feedback::Good => 10.0,
            Feedback::Okay => 5.0,
            Feedback::Bad => -5.0,
        }
    }
}

/// Discrete state the agent keys its values by. Never mutated; only used
/// for lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyState {
    pub hour: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub task_count: usize,
    /// Mean pending-task duration, rounded to whole minutes
    pub avg_task_minutes: i64,
    pub has_events: bool,
    /// Active non-adaptive mode: 0 none, 1 pomodoro, 2 eye-health
    pub mode: u8,
}

impl PolicyState {
    /// Snapshot the state for a scheduling run. `tasks` is the pending
    /// (non-completed) subset.
    pub fn observe(now: DateTime<Utc>, tasks: &[Task], has_events: bool, mode: PlanMode) -> Self {
        let task_count = tasks.len();
        let avg_task_minutes = if task_count > 0 {
            let total: i64 = tasks.iter().map(|t| t.duration_minutes).sum();
            (total as f64 / task_count as f64).round() as i64
        } else {
            0
        };

        Self {
            hour: now.hour(),
            day_of_week: now.weekday().num_days_from_sunday(),
            task_count,
            avg_task_minutes,
            has_events,
            mode: mode.state_code(),
        }
    }

    fn key(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.hour,
            self.day_of_week,
            self.task_count,
            self.avg_task_minutes,
            self.has_events as u8,
            self.mode
        )
    }
}

/// Outcome of one action selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub action: BreakAction,
    pub state: PolicyState,
    /// Whether the action came from the exploration coin flip
    pub explored: bool,
}

/// Serializable agent state: the value table and the episode counter.
/// Exploration is session state and intentionally not part of this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub q_table: HashMap<String, f64>,
    pub episodes: u64,
}

/// Epsilon-greedy Q-learning agent over the break-action catalogue.
pub struct BreakAgent {
    q_table: HashMap<String, f64>,
    exploration_rate: f64,
    episodes: u64,
    rng: Mcg128Xsl64,
}

impl BreakAgent {
    /// Fresh agent with an empty table.
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_snapshot(PolicySnapshot::default(), seed)
    }

    /// Restore an agent from a persisted snapshot.
    pub fn from_snapshot(snapshot: PolicySnapshot, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            q_table: snapshot.q_table,
            exploration_rate: INITIAL_EXPLORATION,
            episodes: snapshot.episodes,
            rng,
        }
    }

    /// Load the persisted snapshot from the store. A missing or corrupt
    /// value is an empty table, never an error; only store availability
    /// failures propagate.
    pub fn load(store: &dyn KeyValueStore, seed: Option<u64>) -> Result<Self, StorageError> {
        let snapshot = match store.get(keys::Q_TABLE)? {
            None => PolicySnapshot::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "corrupt Q-table snapshot, starting empty");
                PolicySnapshot::default()
            }),
        };
        Ok(Self::from_snapshot(snapshot, seed))
    }

    /// Write the current snapshot back to the store.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let snapshot = PolicySnapshot {
            q_table: self.q_table.clone(),
            episodes: self.episodes,
        };
        let raw = serde_json::to_string(&snapshot).map_err(|e| StorageError::CorruptValue {
            key: keys::Q_TABLE.to_string(),
            message: e.to_string(),
        })?;
        store.set(keys::Q_TABLE, &raw)
    }

    /// Override the exploration rate, e.g. 0.0 for a fully greedy run.
    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.exploration_rate = rate.clamp(0.0, 1.0);
        self
    }

    fn value(&self, state: &PolicyState, action: BreakAction) -> f64 {
        let key = format!("{}_{}", state.key(), action.key());
        self.q_table.get(&key).copied().unwrap_or(0.0)
    }

    fn set_value(&mut self, state: &PolicyState, action: BreakAction, value: f64) {
        let key = format!("{}_{}", state.key(), action.key());
        self.q_table.insert(key, value);
    }

    /// Best-known action for `state`, ties broken by catalogue order.
    pub fn best_action(&self, state: &PolicyState) -> BreakAction {
        let mut best = BreakAction::CATALOGUE[0];
        let mut best_value = self.value(state, best);
        for action in BreakAction::CATALOGUE {
            let value = self.value(state, action);
            if value > best_value {
                best_value = value;
                best = action;
            }
        }
        best
    }

    /// Epsilon-greedy action selection for one scheduling run.
    pub fn choose(&mut self, state: &PolicyState) -> Decision {
        if self.rng.gen::<f64>() < self.exploration_rate {
            let index = self.rng.gen_range(0..BreakAction::CATALOGUE.len());
            Decision {
                action: BreakAction::CATALOGUE[index],
                state: *state,
                explored: true,
            }
        } else {
            Decision {
                action: self.best_action(state),
                state: *state,
                explored: false,
            }
        }
    }

    /// Reward for one episode:
    /// feedback points + 30 x completion rate - 1 per unscheduled task.
    pub fn reward(
        feedback: Feedback,
        scheduled_count: usize,
        completed_count: usize,
        unscheduled_count: usize,
    ) -> f64 {
        let mut reward = feedback.points();
        if scheduled_count > 0 {
            let completion_rate = completed_count as f64 / scheduled_count as f64;
            reward += completion_rate * 30.0;
        }
        reward -= unscheduled_count as f64;
        reward
    }

    /// Apply the Q-learning update
    /// `Q(s,a) <- Q(s,a) + alpha * (r + gamma * max_a' Q(s',a') - Q(s,a))`,
    /// bump the episode counter, and decay the exploration rate.
    pub fn update(&mut self, state: &PolicyState, action: BreakAction, reward: f64, next_state: &PolicyState) {
        let current = self.value(state, action);
        let next_best = self.value(next_state, self.best_action(next_state));
        let updated = current + LEARNING_RATE * (reward + DISCOUNT_FACTOR * next_best - current);
        self.set_value(state, action, updated);
        self.episodes += 1;
        self.decay_exploration();
    }

    /// Decay the exploration rate towards its floor. Monotonic; never
    /// resets within a session.
    pub fn decay_exploration(&mut self) {
        self.exploration_rate = (self.exploration_rate * EXPLORATION_DECAY).max(MIN_EXPLORATION);
    }

    /// Current exploration rate.
    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Number of feedback episodes applied so far.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Number of state/action pairs with a stored value. Grows
    /// monotonically; entries are never evicted.
    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn state() -> PolicyState {
        PolicyState {
            hour: 10,
            day_of_week: 1,
            task_count: 3,
            avg_task_minutes: 40,
            has_events: true,
            mode: 0,
        }
    }

    fn other_state() -> PolicyState {
        PolicyState {
            hour: 15,
            ..state()
        }
    }

    #[test]
    fn test_observe_state() {
        // 2025-03-10 is a Monday.
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap();
        let tasks = vec![
            Task::new("A", 30, false).unwrap(),
            Task::new("B", 45, true).unwrap(),
        ];
        let observed = PolicyState::observe(now, &tasks, true, PlanMode::Pomodoro);

        assert_eq!(observed.hour, 14);
        assert_eq!(observed.day_of_week, 1);
        assert_eq!(observed.task_count, 2);
        assert_eq!(observed.avg_task_minutes, 38); // (30+45)/2 rounded
        assert!(observed.has_events);
        assert_eq!(observed.mode, 1);
    }

    #[test]
    fn test_observe_empty_task_list() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let observed = PolicyState::observe(now, &[], false, PlanMode::Normal);
        assert_eq!(observed.task_count, 0);
        assert_eq!(observed.avg_task_minutes, 0);
    }

    #[test]
    fn test_unknown_pairs_default_to_zero() {
        let agent = BreakAgent::new(Some(1));
        assert_eq!(agent.value(&state(), BreakAction::NoBreaks), 0.0);
        // Empty table: ties break to the first catalogue entry.
        assert_eq!(agent.best_action(&state()), BreakAction::ShortFrequent);
    }

    #[test]
    fn test_update_from_empty_table() {
        let mut agent = BreakAgent::new(Some(1));
        agent.update(&state(), BreakAction::ShortBalanced, 20.0, &other_state());

        // Q = 0 + 0.1 * (20 + 0.9 * 0 - 0)
        let value = agent.value(&state(), BreakAction::ShortBalanced);
        assert!((value - 2.0).abs() < 1e-9);
        assert_eq!(agent.episodes(), 1);
        assert_eq!(agent.table_len(), 1);
    }

    #[test]
    fn test_update_uses_next_state_best_value() {
        let mut agent = BreakAgent::new(Some(1));
        agent.set_value(&other_state(), BreakAction::NoBreaks, 10.0);
        agent.update(&state(), BreakAction::ShortFrequent, 5.0, &other_state());

        // Q = 0 + 0.1 * (5 + 0.9 * 10 - 0)
        let value = agent.value(&state(), BreakAction::ShortFrequent);
        assert!((value - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_best_action_prefers_highest_value() {
        let mut agent = BreakAgent::new(Some(1));
        agent.set_value(&state(), BreakAction::LongBalanced, 3.0);
        agent.set_value(&state(), BreakAction::NoBreaks, 7.0);
        assert_eq!(agent.best_action(&state()), BreakAction::NoBreaks);
    }

    #[test]
    fn test_greedy_choice_with_zero_exploration() {
        let mut agent = BreakAgent::new(Some(1)).with_exploration(0.0);
        agent.set_value(&state(), BreakAction::LongInfrequent, 5.0);

        let decision = agent.choose(&state());
        assert_eq!(decision.action, BreakAction::LongInfrequent);
        assert!(!decision.explored);
        assert_eq!(decision.state, state());
    }

    #[test]
    fn test_full_exploration_flags_decision() {
        let mut agent = BreakAgent::new(Some(7)).with_exploration(1.0);
        let decision = agent.choose(&state());
        assert!(decision.explored);
    }

    #[test]
    fn test_choice_deterministic_with_seed() {
        let mut first = BreakAgent::new(Some(42));
        let mut second = BreakAgent::new(Some(42));
        for _ in 0..10 {
            assert_eq!(first.choose(&state()), second.choose(&state()));
        }
    }

    #[test]
    fn test_exploration_decay_monotonic_with_floor() {
        let mut agent = BreakAgent::new(Some(1));
        let mut previous = agent.exploration_rate();
        assert!((previous - INITIAL_EXPLORATION).abs() < 1e-9);

        for _ in 0..2000 {
            agent.decay_exploration();
            let current = agent.exploration_rate();
            assert!(current <= previous);
            assert!(current >= MIN_EXPLORATION);
            previous = current;
        }
        assert!((agent.exploration_rate() - MIN_EXPLORATION).abs() < 1e-9);
    }

    #[test]
    fn test_reward_components() {
        // Good rating, everything completed, nothing unscheduled.
        let reward = BreakAgent::reward(Feedback::Good, 4, 4, 0);
        assert!((reward - 40.0).abs() < 1e-9);

        // Nothing scheduled: completion term absent.
        let reward = BreakAgent::reward(Feedback::Okay, 0, 0, 3);
        assert!((reward - 2.0).abs() < 1e-9);

        // Bad rating with partial completion and leftovers.
        let reward = BreakAgent::reward(Feedback::Bad, 4, 1, 2);
        assert!((reward - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_reward_monotonicity() {
        // Higher completion never lowers the reward.
        for completed in 0..=4 {
            let lower = BreakAgent::reward(Feedback::Okay, 4, completed, 1);
            let higher = BreakAgent::reward(Feedback::Okay, 4, (completed + 1).min(4), 1);
            assert!(higher >= lower);
        }
        // A bad rating is strictly below a good one for identical data.
        let bad = BreakAgent::reward(Feedback::Bad, 4, 2, 1);
        let good = BreakAgent::reward(Feedback::Good, 4, 2, 1);
        assert!(bad < good);
    }

    #[test]
    fn test_snapshot_roundtrip_via_store() {
        let mut store = MemoryStore::new();
        let mut agent = BreakAgent::new(Some(1));
        agent.update(&state(), BreakAction::Adaptive, 12.0, &other_state());
        agent.save(&mut store).unwrap();

        let restored = BreakAgent::load(&store, Some(1)).unwrap();
        assert_eq!(restored.episodes(), 1);
        assert_eq!(restored.table_len(), 1);
        let value = restored.value(&state(), BreakAction::Adaptive);
        assert!((value - 1.2).abs() < 1e-9);
        // Exploration restarts at its initial value each session.
        assert!((restored.exploration_rate() - INITIAL_EXPLORATION).abs() < 1e-9);
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(keys::Q_TABLE, "][ not json").unwrap();
        let agent = BreakAgent::load(&store, Some(1)).unwrap();
        assert_eq!(agent.table_len(), 0);
        assert_eq!(agent.episodes(), 0);
    }

    #[test]
    fn test_action_configs_match_catalogue() {
        assert_eq!(BreakAction::ShortFrequent.config(10), BreakConfig::short_frequent());
        assert_eq!(BreakAction::NoBreaks.config(10), BreakConfig::no_breaks());
        assert_eq!(
            BreakAction::Adaptive.config(13),
            BreakConfig::adaptive_for_hour(13)
        );
    }
}
