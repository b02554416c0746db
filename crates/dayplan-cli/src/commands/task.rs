//! Task management commands.

use clap::{Subcommand, ValueEnum};
use dayplan_core::storage::tasks::{self, ShiftDirection};
use dayplan_core::Task;

use super::common::open_store;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the planning order
    Add {
        /// Task name
        name: String,
        /// Duration in minutes (minimum 5)
        #[arg(long)]
        duration: i64,
        /// Allow splitting across multiple free slots
        #[arg(long)]
        splittable: bool,
    },
    /// List tasks in planning order
    List {
        /// Print the raw task list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task's completed flag
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Move a task one position up or down
    Move {
        /// Task ID
        id: String,
        /// Direction to move
        direction: Direction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TaskAction::Add {
            name,
            duration,
            splittable,
        } => {
            let task = Task::new(&name, duration, splittable)?;
            let id = task.id.clone();
            tasks::add_task(&mut store, task)?;
            println!("Task created: {id}");
        }
        TaskAction::List { json } => {
            let list = tasks::load_tasks(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No tasks yet.");
            } else {
                for task in &list {
                    let split = if task.splittable { ", splittable" } else { "" };
                    let done = if task.completed { "x" } else { " " };
                    println!(
                        "[{}] {}  {} ({} min{})",
                        done, task.id, task.name, task.duration_minutes, split
                    );
                }
            }
        }
        TaskAction::Done { id } => {
            if tasks::toggle_completed(&mut store, &id)? {
                println!("Toggled: {id}");
            } else {
                println!("No task with id {id}");
            }
        }
        TaskAction::Remove { id } => {
            if tasks::remove_task(&mut store, &id)? {
                println!("Removed: {id}");
            } else {
                println!("No task with id {id}");
            }
        }
        TaskAction::Move { id, direction } => {
            let direction = match direction {
                Direction::Up => ShiftDirection::Up,
                Direction::Down => ShiftDirection::Down,
            };
            if tasks::shift_task(&mut store, &id, direction)? {
                println!("Moved: {id}");
            } else {
                println!("Not moved: {id}");
            }
        }
    }

    Ok(())
}
