//! Schedule proposal commands.

use clap::Subcommand;
use dayplan_core::calendar::KeyringTokenProvider;
use dayplan_core::storage::schedule::{clear_plan, load_last_start, load_plan};
use dayplan_core::{CalendarClient, Config, Planner};

use super::common::{format_item, open_store, resolve_start, ModeArg};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a proposal for the rest of the day
    Generate {
        /// Start time as HH:MM (default: now)
        #[arg(long)]
        start: Option<String>,
        /// Break mode override (default: configured mode)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Skip the calendar fetch and plan an empty day
        #[arg(long)]
        offline: bool,
        /// Fixed exploration seed for the adaptive mode
        #[arg(long)]
        seed: Option<u64>,
        /// Print the proposal as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored proposal for a start time
    Show {
        /// Start time as HH:MM (default: last used)
        #[arg(long)]
        start: Option<String>,
        /// Print the proposal as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop the stored proposal for a start time
    Clear {
        /// Start time as HH:MM (default: last used)
        #[arg(long)]
        start: Option<String>,
    },
    /// Push the stored proposal to the calendar
    Push {
        /// Start time as HH:MM (default: last used)
        #[arg(long)]
        start: Option<String>,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            start,
            mode,
            offline,
            seed,
            json,
        } => generate(start.as_deref(), mode, offline, seed, json),
        PlanAction::Show { start, json } => show(start.as_deref(), json),
        PlanAction::Clear { start } => clear(start.as_deref()),
        PlanAction::Push { start } => push(start.as_deref()),
    }
}

fn calendar_client(config: &Config) -> CalendarClient {
    CalendarClient::for_calendar(Box::new(KeyringTokenProvider::new()), &config.calendar_id)
}

/// Resolve the start for commands that default to the last used one.
fn resolve_stored_start(
    store: &dayplan_core::SqliteStore,
    start: Option<&str>,
) -> Result<chrono::DateTime<chrono::Utc>, Box<dyn std::error::Error>> {
    match start {
        Some(start) => resolve_start(Some(start)),
        None => {
            let last = load_last_start(store)?;
            resolve_start(last.as_deref())
        }
    }
}

fn generate(
    start: Option<&str>,
    mode: Option<ModeArg>,
    offline: bool,
    seed: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let config = Config::load()?;
    let now = resolve_start(start)?;

    let busy = if offline {
        Vec::new()
    } else {
        let client = calendar_client(&config);
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(client.fetch_busy_or_empty(now))
    };

    let mut planner = Planner::new(store, config);
    if let Some(seed) = seed {
        planner = planner.with_seed(seed);
    }
    let plan = planner.plan(now, &busy, mode.map(Into::into))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "scheduled": plan.scheduled,
                "unscheduled": plan.unscheduled,
            })
        );
        return Ok(());
    }

    if plan.scheduled.is_empty() {
        println!("No tasks could be scheduled for today.");
    } else {
        for item in &plan.scheduled {
            println!("{}", format_item(item));
        }
    }
    if !plan.unscheduled.is_empty() {
        println!("Unscheduled:");
        for task in &plan.unscheduled {
            println!("  {} ({} min)", task.name, task.duration_minutes);
        }
    }
    if let Some(decision) = &plan.decision {
        let kind = if decision.explored { "exploring" } else { "exploiting" };
        println!("Break strategy: {} ({kind})", decision.action.key());
    }

    Ok(())
}

fn show(start: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let start = resolve_stored_start(&store, start)?;

    let Some(snapshot) = load_plan(&store, start)? else {
        println!("No stored plan for {}.", start.format("%H:%M"));
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for item in &snapshot.scheduled {
        println!("{}", format_item(item));
    }
    if !snapshot.unscheduled.is_empty() {
        println!("Unscheduled:");
        for task in &snapshot.unscheduled {
            println!("  {} ({} min)", task.name, task.duration_minutes);
        }
    }

    Ok(())
}

fn clear(start: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let start = resolve_stored_start(&store, start)?;
    clear_plan(&mut store, start)?;
    println!("Cleared plan for {}.", start.format("%H:%M"));
    Ok(())
}

fn push(start: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let config = Config::load()?;
    let start = resolve_stored_start(&store, start)?;

    let Some(snapshot) = load_plan(&store, start)? else {
        println!("No stored plan for {}. Generate one first.", start.format("%H:%M"));
        return Ok(());
    };

    let client = calendar_client(&config);
    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(client.push_plan(&snapshot.scheduled))?;

    println!("Added {} events to the calendar.", summary.created);
    if summary.failed > 0 {
        println!("Failed to add {} events.", summary.failed);
    }

    Ok(())
}
