//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers that implement the various
//! subcommands, from pattern CRUD and checklist editing to the sweep and
//! single-pattern regeneration flows that drive instance generation.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::path::Path;

use chrono::{Local, NaiveDate, Utc};

use crate::db::*;
use crate::engine::{gate_reference, run_generation_cycle};
use crate::fields::*;
use crate::pattern::{EndCondition, MonthTarget, Pattern, RecurrenceRule, TaskTemplate};
use crate::recurrence::next_occurrence;
use crate::summary::summarize;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new recurrence pattern.
    Add {
        /// Deliverable title copied onto every generated instance.
        title: String,
        /// Cadence: daily | weekly | monthly | yearly.
        #[arg(long, value_enum)]
        repeat: RecurrenceKind,
        /// Interval: every N days/weeks/months/years.
        #[arg(long, default_value_t = 1)]
        every: u32,
        /// Weekdays for weekly patterns (mon..sun). May be repeated or comma-separated.
        #[arg(long = "on")]
        on: Vec<String>,
        /// Fixed day of month (1-31) for monthly/yearly patterns.
        #[arg(long)]
        day: Option<u32>,
        /// Week of month (1-5 or "last") for ordinal monthly/yearly patterns.
        #[arg(long)]
        week: Option<String>,
        /// Weekday for ordinal monthly/yearly patterns (mon..sun).
        #[arg(long)]
        weekday: Option<String>,
        /// Month of year (1-12) for yearly patterns.
        #[arg(long)]
        month: Option<u32>,
        /// Stop after this many generated instances.
        #[arg(long)]
        end_after: Option<u32>,
        /// Stop once the next occurrence would fall after this date.
        #[arg(long)]
        end_by: Option<String>,
        /// Time of day: HH:MM.
        #[arg(long)]
        time: Option<String>,
        /// Timezone identifier, stored as-is.
        #[arg(long)]
        timezone: Option<String>,
        /// Stakeholder the deliverable is owed to.
        #[arg(long)]
        stakeholder: Option<String>,
        /// Goal this pattern contributes to.
        #[arg(long)]
        goal: Option<String>,
        /// Free-form notes copied onto instances.
        #[arg(long)]
        notes: Option<String>,
        /// Create the pattern paused.
        #[arg(long)]
        paused: bool,
    },

    /// List patterns with schedule summary and tracking state.
    List {
        /// Include paused patterns.
        #[arg(long)]
        all: bool,
    },

    /// View a single pattern, including its checklist templates.
    View {
        /// Pattern ID.
        id: u64,
    },

    /// Update fields on a pattern.
    Update {
        /// Pattern ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        stakeholder: Option<String>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Time of day: HH:MM.
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
        /// Change the interval of the existing rule.
        #[arg(long)]
        every: Option<u32>,
        /// Stop after this many generated instances.
        #[arg(long)]
        end_after: Option<u32>,
        /// Stop once the next occurrence would fall after this date.
        #[arg(long)]
        end_by: Option<String>,
        /// Remove any end condition.
        #[arg(long)]
        end_never: bool,
        /// Clear the time of day.
        #[arg(long)]
        clear_time: bool,
        /// Clear notes.
        #[arg(long)]
        clear_notes: bool,
    },

    /// Pause a pattern (halts generation, keeps history).
    Pause {
        /// Pattern ID.
        id: u64,
    },

    /// Resume a paused pattern.
    Resume {
        /// Pattern ID.
        id: u64,
    },

    /// Delete a pattern. Generated instances survive with their
    /// pattern reference cleared.
    Delete {
        /// Pattern ID.
        id: u64,
    },

    /// Manage a pattern's checklist task templates.
    Checklist {
        #[command(subcommand)]
        action: ChecklistAction,
    },

    /// Run one generation cycle for every active pattern that is due.
    Sweep {
        /// Evaluate as if today were this date (YYYY-MM-DD, default: today).
        #[arg(long)]
        today: Option<String>,
    },

    /// Sweep, then list open instances due within the coming window.
    Upcoming {
        /// Evaluate as if today were this date (YYYY-MM-DD, default: today).
        #[arg(long)]
        today: Option<String>,
        /// Window size in days.
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// List generated instances.
    Instances {
        /// Include completed instances.
        #[arg(long)]
        all: bool,
    },

    /// Mark an instance done, then regenerate the next one from its pattern.
    Done {
        /// Instance ID.
        id: u64,
        /// Evaluate regeneration as if today were this date (default: today).
        #[arg(long)]
        today: Option<String>,
    },

    /// Work with a generated instance's checklist.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ChecklistAction {
    /// Add a task template to a pattern.
    Add {
        /// Pattern ID.
        pattern: u64,
        /// Task title.
        title: String,
        /// Scope note for the task.
        #[arg(long)]
        scope: Option<String>,
        /// Explicit order value (default: appended after the current max).
        #[arg(long)]
        order: Option<u32>,
        /// Sub-item description. May be repeated.
        #[arg(long = "sub")]
        subitems: Vec<String>,
    },
    /// List a pattern's task templates.
    List {
        /// Pattern ID.
        pattern: u64,
    },
    /// Remove a task template by position (as shown by list).
    Remove {
        /// Pattern ID.
        pattern: u64,
        /// 1-based position in the list.
        position: usize,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show an instance's checklist with task and sub-item states.
    Show {
        /// Instance ID.
        instance: u64,
    },
    /// Mark a task in progress.
    Start {
        /// Instance ID.
        instance: u64,
        /// 1-based task position.
        task: usize,
    },
    /// Mark a task done.
    Done {
        /// Instance ID.
        instance: u64,
        /// 1-based task position.
        task: usize,
    },
    /// Tick a sub-item on a task.
    Check {
        /// Instance ID.
        instance: u64,
        /// 1-based task position.
        task: usize,
        /// 1-based sub-item position.
        item: usize,
    },
}

/// Resolve a --today override, defaulting to the local calendar date.
fn resolve_today(arg: Option<String>) -> NaiveDate {
    match arg {
        Some(s) => match parse_date_input(&s) {
            Some(d) => d,
            None => {
                eprintln!("Could not parse date: {s}");
                std::process::exit(1);
            }
        },
        None => Local::now().date_naive(),
    }
}

fn save_or_exit(db: &Database, db_path: &Path) {
    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save DB: {e}");
        std::process::exit(1);
    }
}

/// Assemble a recurrence rule from the add-command flags.
fn build_rule(
    repeat: RecurrenceKind,
    every: u32,
    on: &[String],
    day: Option<u32>,
    week: Option<String>,
    weekday: Option<String>,
    month: Option<u32>,
) -> Result<RecurrenceRule, String> {
    match repeat {
        RecurrenceKind::Daily => Ok(RecurrenceRule::Daily { interval: every }),
        RecurrenceKind::Weekly => {
            let mut weekdays = Vec::new();
            for raw in on {
                for part in raw.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    match parse_weekday(part) {
                        Some(d) => weekdays.push(d),
                        None => return Err(format!("Unknown weekday: {part}")),
                    }
                }
            }
            Ok(RecurrenceRule::Weekly { interval: every, weekdays })
        }
        RecurrenceKind::Monthly => {
            let day = build_month_target(day, week, weekday)?;
            Ok(RecurrenceRule::Monthly { interval: every, day })
        }
        RecurrenceKind::Yearly => {
            let month = month.ok_or("Yearly patterns need --month")?;
            let day = build_month_target(day, week, weekday)?;
            Ok(RecurrenceRule::Yearly { interval: every, month, day })
        }
    }
}

/// Exactly one addressing mode: --day, or --week plus --weekday.
fn build_month_target(
    day: Option<u32>,
    week: Option<String>,
    weekday: Option<String>,
) -> Result<MonthTarget, String> {
    match (day, week, weekday) {
        (Some(d), None, None) => Ok(MonthTarget::Fixed(d)),
        (None, Some(w), Some(wd)) => {
            let week = parse_week_of_month(&w)
                .ok_or_else(|| format!("Unknown week of month: {w} (use 1-5 or \"last\")"))?;
            let weekday = parse_weekday(&wd).ok_or_else(|| format!("Unknown weekday: {wd}"))?;
            Ok(MonthTarget::Ordinal { week, weekday })
        }
        (None, Some(_), None) | (None, None, Some(_)) => {
            Err("Ordinal rules need both --week and --weekday".into())
        }
        (Some(_), _, _) => Err("Use either --day or --week/--weekday, not both".into()),
        (None, None, None) => Err("Monthly/yearly patterns need --day or --week/--weekday".into()),
    }
}

fn build_end_condition(
    end_after: Option<u32>,
    end_by: Option<String>,
) -> Result<EndCondition, String> {
    match (end_after, end_by) {
        (None, None) => Ok(EndCondition::Never),
        (Some(count), None) => Ok(EndCondition::AfterCount { count }),
        (None, Some(s)) => {
            let date = parse_date_input(&s).ok_or_else(|| format!("Could not parse date: {s}"))?;
            Ok(EndCondition::ByDate { date })
        }
        (Some(_), Some(_)) => Err("Use either --end-after or --end-by, not both".into()),
    }
}

/// Add a new pattern to the database.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    title: String,
    repeat: RecurrenceKind,
    every: u32,
    on: Vec<String>,
    day: Option<u32>,
    week: Option<String>,
    weekday: Option<String>,
    month: Option<u32>,
    end_after: Option<u32>,
    end_by: Option<String>,
    time: Option<String>,
    timezone: Option<String>,
    stakeholder: Option<String>,
    goal: Option<String>,
    notes: Option<String>,
    paused: bool,
) {
    let rule = match build_rule(repeat, every, &on, day, week, weekday, month) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let end = match build_end_condition(end_after, end_by) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let time_of_day = match time {
        Some(ref s) => match parse_time_input(s) {
            Some(t) => Some(t),
            None => {
                eprintln!("Could not parse time: {s}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let now_utc = Utc::now().timestamp();
    let mut pattern = Pattern {
        id: db.next_pattern_id(),
        title,
        stakeholder,
        goal,
        time_of_day,
        timezone,
        notes,
        rule,
        end,
        status: if paused { PatternStatus::Paused } else { PatternStatus::Active },
        last_generated: None,
        generated_count: 0,
        checklist: Vec::new(),
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    };
    if let Err(e) = pattern.validate() {
        eprintln!("Invalid pattern: {e}");
        std::process::exit(1);
    }

    let id = pattern.id;
    let summary = summarize(&pattern);
    db.patterns.push(pattern);
    save_or_exit(db, db_path);
    println!("Added pattern {id}: {summary}");
}

/// List patterns.
pub fn cmd_list(db: &Database, all: bool) {
    let today = Local::now().date_naive();
    let filtered: Vec<&Pattern> = db
        .patterns
        .iter()
        .filter(|p| all || p.status == PatternStatus::Active)
        .collect();
    if filtered.is_empty() {
        println!("No patterns.");
        return;
    }
    print_pattern_table(&filtered, today);
}

/// View one pattern in detail.
pub fn cmd_view(db: &Database, id: u64) {
    let Some(p) = db.get_pattern(id) else {
        eprintln!("Pattern {id} not found");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();

    println!("Pattern {}: {}", p.id, p.title);
    println!("  Schedule:    {}", summarize(p));
    println!("  Status:      {}", format_pattern_status(p.status));
    if let RecurrenceRule::Weekly { weekdays, .. } = &p.rule {
        println!("  Weekdays:    {}", format_weekday_set(weekdays));
    }
    match p.end {
        EndCondition::Never => {}
        EndCondition::AfterCount { count } => {
            println!("  Ends:        after {count} instances");
        }
        EndCondition::ByDate { date } => println!("  Ends:        by {date}"),
    }
    if let Some(s) = &p.stakeholder {
        println!("  Stakeholder: {s}");
    }
    if let Some(g) = &p.goal {
        println!("  Goal:        {g}");
    }
    if let Some(t) = p.time_of_day {
        println!("  Time:        {}", t.format("%H:%M"));
    }
    if let Some(z) = &p.timezone {
        println!("  Timezone:    {z}");
    }
    if let Some(n) = &p.notes {
        println!("  Notes:       {n}");
    }
    println!(
        "  Generated:   {} (last: {})",
        p.generated_count,
        p.last_generated
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into())
    );
    match next_occurrence(p, gate_reference(p, today)) {
        Some(d) => println!("  Next:        {d}"),
        None => println!("  Next:        -"),
    }
    if !p.checklist.is_empty() {
        println!("  Checklist:");
        for (i, t) in p.checklist.iter().enumerate() {
            let scope = t
                .scope
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default();
            println!("    {}. [order {}] {}{}", i + 1, t.order, t.title, scope);
            for sub in &t.subitems {
                println!("       - {sub}");
            }
        }
    }
}

/// Update fields on a pattern.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: u64,
    title: Option<String>,
    stakeholder: Option<String>,
    goal: Option<String>,
    notes: Option<String>,
    time: Option<String>,
    timezone: Option<String>,
    every: Option<u32>,
    end_after: Option<u32>,
    end_by: Option<String>,
    end_never: bool,
    clear_time: bool,
    clear_notes: bool,
) {
    let new_end = if end_never {
        Some(EndCondition::Never)
    } else {
        match build_end_condition(end_after, end_by) {
            Ok(EndCondition::Never) => None,
            Ok(e) => Some(e),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    };
    let new_time = match time {
        Some(ref s) => match parse_time_input(s) {
            Some(t) => Some(t),
            None => {
                eprintln!("Could not parse time: {s}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let Some(p) = db.get_pattern_mut(id) else {
        eprintln!("Pattern {id} not found");
        std::process::exit(1);
    };

    if let Some(t) = title {
        p.title = t;
    }
    if stakeholder.is_some() {
        p.stakeholder = stakeholder;
    }
    if goal.is_some() {
        p.goal = goal;
    }
    if clear_notes {
        p.notes = None;
    } else if notes.is_some() {
        p.notes = notes;
    }
    if clear_time {
        p.time_of_day = None;
    } else if new_time.is_some() {
        p.time_of_day = new_time;
    }
    if timezone.is_some() {
        p.timezone = timezone;
    }
    if let Some(n) = every {
        match &mut p.rule {
            RecurrenceRule::Daily { interval }
            | RecurrenceRule::Weekly { interval, .. }
            | RecurrenceRule::Monthly { interval, .. }
            | RecurrenceRule::Yearly { interval, .. } => *interval = n,
        }
    }
    if let Some(e) = new_end {
        p.end = e;
    }
    p.updated_at_utc = Utc::now().timestamp();

    // Re-validate before the save; an invalid edit never reaches disk.
    if let Err(e) = p.validate() {
        eprintln!("Invalid pattern: {e}");
        std::process::exit(1);
    }
    save_or_exit(db, db_path);
    println!("Updated pattern {id}");
}

/// Set a pattern's lifecycle status.
pub fn cmd_set_status(db: &mut Database, db_path: &Path, id: u64, status: PatternStatus) {
    let Some(p) = db.get_pattern_mut(id) else {
        eprintln!("Pattern {id} not found");
        std::process::exit(1);
    };
    p.status = status;
    p.updated_at_utc = Utc::now().timestamp();
    save_or_exit(db, db_path);
    println!("Pattern {id} is now {}", format_pattern_status(status));
}

/// Delete a pattern, clearing instance back-references.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: u64) {
    if !db.remove_pattern(id) {
        eprintln!("Pattern {id} not found");
        std::process::exit(1);
    }
    save_or_exit(db, db_path);
    println!("Deleted pattern {id}");
}

/// Manage checklist task templates on a pattern.
pub fn cmd_checklist(db: &mut Database, db_path: &Path, action: ChecklistAction) {
    match action {
        ChecklistAction::Add { pattern, title, scope, order, subitems } => {
            let Some(p) = db.get_pattern_mut(pattern) else {
                eprintln!("Pattern {pattern} not found");
                std::process::exit(1);
            };
            let order = order.unwrap_or_else(|| {
                p.checklist.iter().map(|t| t.order).max().map_or(1, |m| m + 1)
            });
            p.checklist.push(TaskTemplate { title, scope, order, subitems });
            p.checklist.sort_by_key(|t| t.order);
            p.updated_at_utc = Utc::now().timestamp();
            save_or_exit(db, db_path);
            println!("Added checklist task to pattern {pattern}");
        }
        ChecklistAction::List { pattern } => {
            let Some(p) = db.get_pattern(pattern) else {
                eprintln!("Pattern {pattern} not found");
                std::process::exit(1);
            };
            if p.checklist.is_empty() {
                println!("Pattern {pattern} has no checklist tasks.");
                return;
            }
            for (i, t) in p.checklist.iter().enumerate() {
                let scope = t
                    .scope
                    .as_deref()
                    .map(|s| format!(" ({s})"))
                    .unwrap_or_default();
                println!("{}. [order {}] {}{}", i + 1, t.order, t.title, scope);
                for sub in &t.subitems {
                    println!("   - {sub}");
                }
            }
        }
        ChecklistAction::Remove { pattern, position } => {
            let Some(p) = db.get_pattern_mut(pattern) else {
                eprintln!("Pattern {pattern} not found");
                std::process::exit(1);
            };
            if position == 0 || position > p.checklist.len() {
                eprintln!(
                    "Position {position} out of range (1..={})",
                    p.checklist.len()
                );
                std::process::exit(1);
            }
            let removed = p.checklist.remove(position - 1);
            p.updated_at_utc = Utc::now().timestamp();
            save_or_exit(db, db_path);
            println!("Removed checklist task: {}", removed.title);
        }
    }
}

/// Run one generation cycle for every active pattern. Each pattern yields
/// at most one instance per sweep; a dormant pattern catches up across
/// repeated sweeps rather than producing a backlog.
pub fn cmd_sweep(db: &mut Database, db_path: &Path, today_arg: Option<String>) {
    let today = resolve_today(today_arg);
    let generated = sweep(db, today);
    if generated.is_empty() {
        println!("Nothing due.");
        return;
    }
    save_or_exit(db, db_path);
    for id in &generated {
        if let Some(inst) = db.get_instance(*id) {
            println!("Generated instance {} due {}: {}", inst.id, inst.due, inst.title);
        }
    }
}

/// One cycle per active pattern; returns the new instance ids.
fn sweep(db: &mut Database, today: NaiveDate) -> Vec<u64> {
    let now_utc = Utc::now().timestamp();
    let ids: Vec<u64> = db
        .patterns
        .iter()
        .filter(|p| p.status == PatternStatus::Active)
        .map(|p| p.id)
        .collect();
    ids.into_iter()
        .filter_map(|id| run_generation_cycle(db, id, today, now_utc))
        .collect()
}

/// Sweep, then show open instances due inside the window.
pub fn cmd_upcoming(db: &mut Database, db_path: &Path, today_arg: Option<String>, days: i64) {
    let today = resolve_today(today_arg);
    if !sweep(db, today).is_empty() {
        save_or_exit(db, db_path);
    }
    let horizon = today + chrono::Duration::days(days);
    let mut upcoming: Vec<_> = db
        .instances
        .iter()
        .filter(|i| !i.done && i.due <= horizon)
        .collect();
    upcoming.sort_by_key(|i| (i.due, i.id));
    if upcoming.is_empty() {
        println!("Nothing due in the next {days} days.");
        return;
    }
    print_instance_table(&upcoming, today);
}

/// List generated instances.
pub fn cmd_instances(db: &Database, all: bool) {
    let today = Local::now().date_naive();
    let mut filtered: Vec<_> = db
        .instances
        .iter()
        .filter(|i| all || !i.done)
        .collect();
    filtered.sort_by_key(|i| (i.due, i.id));
    if filtered.is_empty() {
        println!("No instances.");
        return;
    }
    print_instance_table(&filtered, today);
}

/// Complete an instance, then run one regeneration cycle on its pattern.
pub fn cmd_done(db: &mut Database, db_path: &Path, id: u64, today_arg: Option<String>) {
    let today = resolve_today(today_arg);
    let Some(inst) = db.get_instance_mut(id) else {
        eprintln!("Instance {id} not found");
        std::process::exit(1);
    };
    inst.done = true;
    let pattern_id = inst.pattern_id;
    println!("Completed instance {id}");

    if let Some(pid) = pattern_id {
        if db.get_pattern(pid).is_some() {
            if let Some(new_id) = run_generation_cycle(db, pid, today, Utc::now().timestamp()) {
                if let Some(new_inst) = db.get_instance(new_id) {
                    println!(
                        "Generated instance {} due {}: {}",
                        new_inst.id, new_inst.due, new_inst.title
                    );
                }
            }
        }
    }
    save_or_exit(db, db_path);
}

/// Checklist operations on a generated instance.
pub fn cmd_task(db: &mut Database, db_path: &Path, action: TaskAction) {
    match action {
        TaskAction::Show { instance } => {
            let Some(inst) = db.get_instance(instance) else {
                eprintln!("Instance {instance} not found");
                std::process::exit(1);
            };
            println!("Instance {}: {} (due {})", inst.id, inst.title, inst.due);
            if inst.tasks.is_empty() {
                println!("  No checklist tasks.");
                return;
            }
            for (i, t) in inst.tasks.iter().enumerate() {
                println!(
                    "  {}. [{}] {}",
                    i + 1,
                    format_task_state(t.state),
                    t.title
                );
                for (j, sub) in t.subitems.iter().enumerate() {
                    let mark = if sub.completed { "x" } else { " " };
                    println!("     {}.{} [{}] {}", i + 1, j + 1, mark, sub.text);
                }
            }
        }
        TaskAction::Start { instance, task } => {
            set_task_state(db, db_path, instance, task, TaskState::InProgress);
        }
        TaskAction::Done { instance, task } => {
            set_task_state(db, db_path, instance, task, TaskState::Done);
        }
        TaskAction::Check { instance, task, item } => {
            let Some(inst) = db.get_instance_mut(instance) else {
                eprintln!("Instance {instance} not found");
                std::process::exit(1);
            };
            if task == 0 || task > inst.tasks.len() {
                eprintln!("Task {task} out of range (1..={})", inst.tasks.len());
                std::process::exit(1);
            }
            let t = &mut inst.tasks[task - 1];
            if item == 0 || item > t.subitems.len() {
                eprintln!("Sub-item {item} out of range (1..={})", t.subitems.len());
                std::process::exit(1);
            }
            t.subitems[item - 1].completed = true;
            save_or_exit(db, db_path);
            println!("Checked sub-item {item} on task {task}");
        }
    }
}

fn set_task_state(db: &mut Database, db_path: &Path, instance: u64, task: usize, state: TaskState) {
    let Some(inst) = db.get_instance_mut(instance) else {
        eprintln!("Instance {instance} not found");
        std::process::exit(1);
    };
    if task == 0 || task > inst.tasks.len() {
        eprintln!("Task {task} out of range (1..={})", inst.tasks.len());
        std::process::exit(1);
    }
    inst.tasks[task - 1].state = state;
    save_or_exit(db, db_path);
    println!("Task {task} is now {}", format_task_state(state));
}

/// Generate shell completions to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rule_weekly_splits_commas() {
        let rule = build_rule(
            RecurrenceKind::Weekly,
            1,
            &["mon,wed".into(), "fri".into()],
            None,
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::Weekly { interval: 1, weekdays: vec![0, 2, 4] }
        );
    }

    #[test]
    fn test_build_rule_rejects_unknown_weekday() {
        let err = build_rule(
            RecurrenceKind::Weekly,
            1,
            &["mon,funday".into()],
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(err.contains("funday"));
    }

    #[test]
    fn test_build_month_target_modes_are_exclusive() {
        assert!(build_month_target(Some(15), None, None).is_ok());
        assert!(build_month_target(None, Some("2nd".into()), Some("tue".into())).is_ok());
        assert!(build_month_target(Some(15), Some("2nd".into()), Some("tue".into())).is_err());
        assert!(build_month_target(None, Some("2nd".into()), None).is_err());
        assert!(build_month_target(None, None, None).is_err());
    }

    #[test]
    fn test_build_rule_yearly_needs_month() {
        assert!(build_rule(
            RecurrenceKind::Yearly,
            1,
            &[],
            Some(15),
            None,
            None,
            None
        )
        .is_err());
    }

    #[test]
    fn test_build_end_condition_exclusive() {
        assert_eq!(build_end_condition(None, None), Ok(EndCondition::Never));
        assert_eq!(
            build_end_condition(Some(5), None),
            Ok(EndCondition::AfterCount { count: 5 })
        );
        assert!(build_end_condition(Some(5), Some("2026-01-01".into())).is_err());
    }
}
