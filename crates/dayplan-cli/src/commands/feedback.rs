//! Feedback commands for the adaptive break policy.

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use dayplan_core::calendar::KeyringTokenProvider;
use dayplan_core::{BreakAgent, CalendarClient, Config, Feedback, Planner};

use super::common::open_store;

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Rate the most recent adaptive plan
    Rate {
        /// How the proposed schedule worked out
        rating: RatingArg,
        /// How many scheduled tasks were completed
        #[arg(long, default_value_t = 0)]
        completed: usize,
        /// Skip the calendar fetch when observing the follow-up state
        #[arg(long)]
        offline: bool,
    },
    /// Show learning statistics
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RatingArg {
    Good,
    Okay,
    Bad,
}

impl From<RatingArg> for Feedback {
    fn from(rating: RatingArg) -> Self {
        match rating {
            RatingArg::Good => Feedback::Good,
            RatingArg::Okay => Feedback::Okay,
            RatingArg::Bad => Feedback::Bad,
        }
    }
}

pub fn run(action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FeedbackAction::Rate {
            rating,
            completed,
            offline,
        } => {
            let store = open_store()?;
            let config = Config::load()?;
            let now = Utc::now();

            let busy = if offline {
                Vec::new()
            } else {
                let client = CalendarClient::for_calendar(
                    Box::new(KeyringTokenProvider::new()),
                    &config.calendar_id,
                );
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(client.fetch_busy_or_empty(now))
            };

            let mut planner = Planner::new(store, config);
            let report = planner.record_feedback(now, &busy, rating.into(), completed, None)?;

            println!("Reward: {:.1}", report.reward);
            println!("Episodes: {}", report.episodes);
            println!("Exploration rate: {:.3}", report.exploration_rate);
        }
        FeedbackAction::Stats => {
            let store = open_store()?;
            let agent = BreakAgent::load(&store, None)?;
            println!("Learned state/action pairs: {}", agent.table_len());
            println!("Episodes: {}", agent.episodes());
            println!("Exploration rate: {:.3}", agent.exploration_rate());
        }
    }

    Ok(())
}
