//! Database operations and utility functions for the recurrence store.
//!
//! This module provides the `Database` struct holding patterns and their
//! generated instances, JSON load/save with an atomic temp-file rename,
//! id allocation, and date parsing/formatting helpers for the CLI layer.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::fields::{format_pattern_status, format_weekday};
use crate::instance::Instance;
use crate::pattern::Pattern;
use crate::recurrence::next_occurrence;
use crate::summary::summarize;

/// In-memory store for patterns and generated instances.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Database {
    /// Load database from JSON file, creating a new empty database if file doesn't exist.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing DB, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading DB, starting fresh: {e}");
                Database::default()
            }
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    ///
    /// One save call persists a generated instance together with its
    /// pattern's advanced tracking fields, so a crash leaves either both
    /// or neither on disk.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available pattern ID.
    pub fn next_pattern_id(&self) -> u64 {
        self.patterns.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available instance ID.
    pub fn next_instance_id(&self) -> u64 {
        self.instances.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    pub fn get_pattern(&self, id: u64) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn get_pattern_mut(&mut self, id: u64) -> Option<&mut Pattern> {
        self.patterns.iter_mut().find(|p| p.id == id)
    }

    pub fn get_instance(&self, id: u64) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn get_instance_mut(&mut self, id: u64) -> Option<&mut Instance> {
        self.instances.iter_mut().find(|i| i.id == id)
    }

    /// Remove a pattern, clearing the back-reference on every instance it
    /// generated. Instances are historical facts and are never cascaded.
    pub fn remove_pattern(&mut self, id: u64) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.id != id);
        if self.patterns.len() == before {
            return false;
        }
        for inst in self.instances.iter_mut() {
            if inst.pattern_id == Some(id) {
                inst.pattern_id = None;
            }
        }
        true
    }
}

/// Parse a date argument: "YYYY-MM-DD", "today", "tomorrow", or "in Nd"/"in Nw".
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Parse a time-of-day argument: "HH:MM" or "HH:MM:SS".
pub fn parse_time_input(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let delta = (due - today).num_days();
    match delta {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print patterns in a formatted table with schedule summary and tracking state.
pub fn print_pattern_table(patterns: &[&Pattern], today: NaiveDate) {
    println!(
        "{:<5} {:<8} {:<30} {:<12} {:<12} {:<5} {}",
        "ID", "Status", "Schedule", "Next", "Last", "Gen", "Title"
    );
    for p in patterns {
        let next = match next_occurrence(p, crate::engine::gate_reference(p, today)) {
            Some(d) => d.to_string(),
            None => "-".into(),
        };
        let last = p
            .last_generated
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<5} {:<8} {:<30} {:<12} {:<12} {:<5} {}",
            p.id,
            format_pattern_status(p.status),
            truncate(&summarize(p), 30),
            next,
            last,
            p.generated_count,
            p.title
        );
    }
}

/// Print generated instances in a formatted table.
pub fn print_instance_table(instances: &[&Instance], today: NaiveDate) {
    println!(
        "{:<5} {:<12} {:<10} {:<8} {:<7} {}",
        "ID", "Due", "When", "Pattern", "Tasks", "Title"
    );
    for i in instances {
        let pattern = i
            .pattern_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        let when = if i.done {
            "done".into()
        } else {
            format_due_relative(i.due, today)
        };
        println!(
            "{:<5} {:<12} {:<10} {:<8} {:<7} {}",
            i.id,
            i.due.to_string(),
            when,
            pattern,
            i.tasks.len(),
            i.title
        );
    }
}

/// Render a weekday set for detail views: "Mon, Wed, Fri".
pub fn format_weekday_set(days: &[u8]) -> String {
    days.iter()
        .map(|&d| format_weekday(d))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_instance;
    use crate::pattern::{sample_pattern, RecurrenceRule};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_remove_pattern_clears_references() {
        let mut db = Database::default();
        let p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        db.instances
            .push(generate_instance(&p, date(2025, 12, 17), 1, 0));
        db.instances
            .push(generate_instance(&p, date(2025, 12, 18), 2, 0));
        db.patterns.push(p);

        assert!(db.remove_pattern(1));
        assert!(db.get_pattern(1).is_none());
        // Instances survive with their back-reference nulled.
        assert_eq!(db.instances.len(), 2);
        assert!(db.instances.iter().all(|i| i.pattern_id.is_none()));

        assert!(!db.remove_pattern(1));
    }

    #[test]
    fn test_id_allocation() {
        let mut db = Database::default();
        assert_eq!(db.next_pattern_id(), 1);
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.id = 7;
        db.patterns.push(p);
        assert_eq!(db.next_pattern_id(), 8);
        assert_eq!(db.next_instance_id(), 1);
    }

    #[test]
    fn test_parse_date_input_iso() {
        assert_eq!(parse_date_input("2025-12-17"), Some(date(2025, 12, 17)));
        assert_eq!(parse_date_input("not a date"), None);
    }

    #[test]
    fn test_parse_time_input() {
        assert_eq!(
            parse_time_input("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(parse_time_input("25:00"), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = date(2025, 12, 17);
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(date(2025, 12, 18), today), "tomorrow");
        assert_eq!(format_due_relative(date(2025, 12, 20), today), "in 3d");
        assert_eq!(format_due_relative(date(2025, 12, 15), today), "2d late");
    }
}
