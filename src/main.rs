//! # rtask - Recurring Task CLI
//!
//! A command-line recurrence engine for periodically-repeating obligations.
//! Patterns describe what is owed and on what calendar rule; the engine
//! spawns concrete dated instances from them on demand, one occurrence per
//! check, however long a pattern has sat dormant.
//!
//! ## Key Features
//!
//! - **Four cadences**: daily, weekly (weekday sets), monthly and yearly
//!   (fixed day or "Nth/last weekday" ordinal rules), each with an
//!   "every N" interval
//! - **End conditions**: run forever, stop after N instances, or stop at a
//!   cutoff date
//! - **Checklists**: task templates on a pattern are hydrated into fresh
//!   checklist copies on every generated instance
//! - **Catch-up by design**: a dormant pattern resumes one occurrence per
//!   sweep, never dumping a backlog
//! - **Local File Storage**: one JSON file, written atomically
//!
//! ## Quick Start
//!
//! ```bash
//! # A report due every Monday morning
//! rtask add "Weekly status report" --repeat weekly --on mon --time 09:00
//!
//! # Rent on the last business-ish day: the last Friday of each month
//! rtask add "Pay rent" --repeat monthly --week last --weekday fri
//!
//! # Give the report a checklist
//! rtask checklist add 1 "Collect metrics" --sub "deploys" --sub "incidents"
//!
//! # Generate whatever is due, then see the week ahead
//! rtask sweep
//! rtask upcoming
//!
//! # Completing an instance queues up the next occurrence
//! rtask done 3
//! ```
//!
//! Data is stored locally in `~/.rtask/patterns.json`. We recommend you
//! source control this folder via `git init` and back it up periodically.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod engine;
pub mod fields;
pub mod instance;
pub mod pattern;
pub mod recurrence;
pub mod summary;

use cli::Cli;
use cmd::*;
use db::Database;

fn main() {
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".rtask");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create rtask directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("patterns.json")
    });

    let mut db = Database::load(&db_path);

    match cli.command {
        Commands::Add {
            title, repeat, every, on, day, week, weekday, month, end_after,
            end_by, time, timezone, stakeholder, goal, notes, paused,
        } => cmd_add(&mut db, &db_path, title, repeat, every, on, day, week,
                     weekday, month, end_after, end_by, time, timezone,
                     stakeholder, goal, notes, paused),

        Commands::List { all } => cmd_list(&db, all),

        Commands::View { id } => cmd_view(&db, id),

        Commands::Update { id, title, stakeholder, goal, notes, time, timezone,
                          every, end_after, end_by, end_never, clear_time, clear_notes } =>
            cmd_update(&mut db, &db_path, id, title, stakeholder, goal, notes, time,
                      timezone, every, end_after, end_by, end_never, clear_time, clear_notes),

        Commands::Pause { id } =>
            cmd_set_status(&mut db, &db_path, id, fields::PatternStatus::Paused),

        Commands::Resume { id } =>
            cmd_set_status(&mut db, &db_path, id, fields::PatternStatus::Active),

        Commands::Delete { id } => cmd_delete(&mut db, &db_path, id),

        Commands::Checklist { action } => cmd_checklist(&mut db, &db_path, action),

        Commands::Sweep { today } => cmd_sweep(&mut db, &db_path, today),

        Commands::Upcoming { today, days } => cmd_upcoming(&mut db, &db_path, today, days),

        Commands::Instances { all } => cmd_instances(&db, all),

        Commands::Done { id, today } => cmd_done(&mut db, &db_path, id, today),

        Commands::Task { action } => cmd_task(&mut db, &db_path, action),

        Commands::Completions { shell } => cmd_completions(shell),
    }
}
