//! Reinforcement-learning break policy.
//!
//! A tabular epsilon-greedy Q-learning agent chooses one of six break
//! configurations per scheduling run and learns from post-hoc feedback
//! (user rating plus completion data). The value table is the only
//! long-lived mutable state the core owns; it is loaded from and written
//! back to the key-value store, single writer assumed.

mod agent;

pub use agent::{
    BreakAction, BreakAgent, Decision, Feedback, PolicySnapshot, PolicyState, DISCOUNT_FACTOR,
    EXPLORATION_DECAY, INITIAL_EXPLORATION, LEARNING_RATE, MIN_EXPLORATION,
};
