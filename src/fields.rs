//! Enumerations and field types shared across the recurrence engine.
//!
//! This module defines the small structured types used to describe patterns
//! and generated instances, together with `parse_*` / `format_*` helpers for
//! the CLI surface.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Recurrence cadence, selected on the command line when adding a pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Lifecycle status of a pattern. Pausing halts generation without
/// erasing tracking history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PatternStatus {
    #[serde(alias = "Active")]
    Active,
    #[serde(alias = "Paused")]
    Paused,
}

/// Progress state of a task on a generated instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    NotStarted,
    InProgress,
    Done,
}

/// Which week of the month an ordinal-weekday rule addresses.
///
/// `Fifth` is permitted but a month may not contain a fifth occurrence of a
/// weekday; the calculator falls back to the month's final occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last,
}

impl WeekOfMonth {
    /// 1-based week number for the positive variants, `None` for `Last`.
    pub fn ordinal(self) -> Option<u32> {
        match self {
            WeekOfMonth::First => Some(1),
            WeekOfMonth::Second => Some(2),
            WeekOfMonth::Third => Some(3),
            WeekOfMonth::Fourth => Some(4),
            WeekOfMonth::Fifth => Some(5),
            WeekOfMonth::Last => None,
        }
    }
}

/// Parse a week-of-month argument: "1".."5", "1st".."5th", or "last".
pub fn parse_week_of_month(s: &str) -> Option<WeekOfMonth> {
    match s.trim().to_lowercase().as_str() {
        "1" | "1st" | "first" => Some(WeekOfMonth::First),
        "2" | "2nd" | "second" => Some(WeekOfMonth::Second),
        "3" | "3rd" | "third" => Some(WeekOfMonth::Third),
        "4" | "4th" | "fourth" => Some(WeekOfMonth::Fourth),
        "5" | "5th" | "fifth" => Some(WeekOfMonth::Fifth),
        "last" => Some(WeekOfMonth::Last),
        _ => None,
    }
}

/// Weekday names, Monday-first to match `num_days_from_monday`.
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Three-letter month abbreviations, January-first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a weekday name ("mon", "monday", ...) to 0=Monday..6=Sunday.
pub fn parse_weekday(s: &str) -> Option<u8> {
    match s.trim().to_lowercase().as_str() {
        "mon" | "monday" => Some(0),
        "tue" | "tues" | "tuesday" => Some(1),
        "wed" | "wednesday" => Some(2),
        "thu" | "thur" | "thursday" => Some(3),
        "fri" | "friday" => Some(4),
        "sat" | "saturday" => Some(5),
        "sun" | "sunday" => Some(6),
        _ => None,
    }
}

/// Format a 0=Monday..6=Sunday weekday index as a three-letter name.
pub fn format_weekday(day: u8) -> &'static str {
    WEEKDAY_NAMES.get(day as usize).copied().unwrap_or("?")
}

/// Format a pattern status for display.
pub fn format_pattern_status(s: PatternStatus) -> &'static str {
    match s {
        PatternStatus::Active => "Active",
        PatternStatus::Paused => "Paused",
    }
}

/// Format a task state for display.
pub fn format_task_state(s: TaskState) -> &'static str {
    match s {
        TaskState::NotStarted => "NotStarted",
        TaskState::InProgress => "InProgress",
        TaskState::Done => "Done",
    }
}

/// Standard English ordinal suffix: 1st, 2nd, 3rd, 4th, ... 11th, 12th,
/// 13th, ... 21st, 22nd, 23rd, 31st.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match n % 100 {
        11 | 12 | 13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
