//! Recurrence pattern entity and construction-time validation.
//!
//! A `Pattern` is a reusable template for a periodically-repeating
//! obligation: what is owed, to whom, on what calendar rule, plus the
//! tracking state that records what has already been generated from it.
//! Validation lives here so that an invalid rule can never reach the
//! calculator — the calendar arithmetic in `recurrence` is total over
//! patterns that passed `validate`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::{PatternStatus, WeekOfMonth};

/// A recurrence template plus its generation-tracking state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: u64,
    /// Deliverable text copied verbatim onto every generated instance.
    pub title: String,
    pub stakeholder: Option<String>,
    pub goal: Option<String>,
    pub time_of_day: Option<NaiveTime>,
    /// Opaque zone identifier, carried but never interpreted.
    pub timezone: Option<String>,
    pub notes: Option<String>,
    pub rule: RecurrenceRule,
    #[serde(default)]
    pub end: EndCondition,
    pub status: PatternStatus,
    /// Date of the most recently generated occurrence. Monotonically
    /// non-decreasing; never reset, even by pausing.
    pub last_generated: Option<NaiveDate>,
    /// Count of successful generations. Advances by exactly 1 per cycle.
    #[serde(default)]
    pub generated_count: u32,
    #[serde(default)]
    pub checklist: Vec<TaskTemplate>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// A template for one task on each generated instance's checklist.
///
/// Templates are immutable archetypes: sub-items are bare descriptions with
/// no completion state, which only exists on generated copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub title: String,
    pub scope: Option<String>,
    pub order: u32,
    #[serde(default)]
    pub subitems: Vec<String>,
}

/// The calendar rule: cadence tag plus cadence-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RecurrenceRule {
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        /// Selected weekdays, 0=Monday..6=Sunday. Kept sorted and
        /// duplicate-free by `validate`.
        weekdays: Vec<u8>,
    },
    Monthly {
        interval: u32,
        day: MonthTarget,
    },
    Yearly {
        interval: u32,
        /// 1=January..12=December.
        month: u32,
        day: MonthTarget,
    },
}

/// How a monthly or yearly rule addresses a day within its month.
/// Exactly one mode per pattern; the choice is made once at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MonthTarget {
    /// A fixed day-of-month 1..=31, clamped to the month's actual length.
    Fixed(u32),
    /// "The Nth (or last) weekday of the month."
    Ordinal { week: WeekOfMonth, weekday: u8 },
}

/// When a pattern stops producing occurrences.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EndCondition {
    #[default]
    Never,
    AfterCount {
        count: u32,
    },
    ByDate {
        date: NaiveDate,
    },
}

/// Rejection reasons raised when constructing or updating a pattern.
/// These surface before persistence and block the save.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("interval must be at least 1")]
    ZeroInterval,
    #[error("weekly pattern needs at least one weekday")]
    EmptyWeekdaySet,
    #[error("weekday {0} out of range (0=Mon..6=Sun)")]
    WeekdayOutOfRange(u8),
    #[error("weekday {0} selected more than once")]
    DuplicateWeekday(u8),
    #[error("day of month {0} out of range (1..=31)")]
    DayOutOfRange(u32),
    #[error("month {0} out of range (1..=12)")]
    MonthOutOfRange(u32),
    #[error("end-after count must be at least 1")]
    ZeroEndCount,
}

impl RecurrenceRule {
    pub fn interval(&self) -> u32 {
        match self {
            RecurrenceRule::Daily { interval }
            | RecurrenceRule::Weekly { interval, .. }
            | RecurrenceRule::Monthly { interval, .. }
            | RecurrenceRule::Yearly { interval, .. } => *interval,
        }
    }

    /// Check rule-level invariants and normalise the weekday set
    /// (sorted ascending). Duplicates are an error, not silently merged.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.interval() == 0 {
            return Err(ValidationError::ZeroInterval);
        }
        match self {
            RecurrenceRule::Daily { .. } => {}
            RecurrenceRule::Weekly { weekdays, .. } => {
                if weekdays.is_empty() {
                    return Err(ValidationError::EmptyWeekdaySet);
                }
                for &d in weekdays.iter() {
                    if d > 6 {
                        return Err(ValidationError::WeekdayOutOfRange(d));
                    }
                }
                weekdays.sort_unstable();
                for pair in weekdays.windows(2) {
                    if pair[0] == pair[1] {
                        return Err(ValidationError::DuplicateWeekday(pair[0]));
                    }
                }
            }
            RecurrenceRule::Monthly { day, .. } => validate_month_target(*day)?,
            RecurrenceRule::Yearly { month, day, .. } => {
                if !(1..=12).contains(month) {
                    return Err(ValidationError::MonthOutOfRange(*month));
                }
                validate_month_target(*day)?;
            }
        }
        Ok(())
    }
}

fn validate_month_target(day: MonthTarget) -> Result<(), ValidationError> {
    match day {
        MonthTarget::Fixed(d) => {
            if !(1..=31).contains(&d) {
                return Err(ValidationError::DayOutOfRange(d));
            }
        }
        MonthTarget::Ordinal { weekday, .. } => {
            if weekday > 6 {
                return Err(ValidationError::WeekdayOutOfRange(weekday));
            }
        }
    }
    Ok(())
}

impl EndCondition {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let EndCondition::AfterCount { count: 0 } = self {
            return Err(ValidationError::ZeroEndCount);
        }
        Ok(())
    }
}

impl Pattern {
    /// Validate the whole pattern. Called before every save from the
    /// command layer; an `Err` blocks persistence.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.rule.validate()?;
        self.end.validate()
    }

    /// Whether an after-count end condition has been used up. A `ByDate`
    /// cutoff is checked against candidates in the calculator instead,
    /// since exhaustion there depends on the date being asked about.
    pub fn count_exhausted(&self) -> bool {
        matches!(self.end, EndCondition::AfterCount { count } if self.generated_count >= count)
    }
}

/// Minimal active pattern for test setups across the crate.
#[cfg(test)]
pub(crate) fn sample_pattern(rule: RecurrenceRule) -> Pattern {
    Pattern {
        id: 1,
        title: "Submit status report".into(),
        stakeholder: None,
        goal: None,
        time_of_day: None,
        timezone: None,
        notes: None,
        rule,
        end: EndCondition::Never,
        status: PatternStatus::Active,
        last_generated: None,
        generated_count: 0,
        checklist: Vec::new(),
        created_at_utc: 0,
        updated_at_utc: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 0 });
        assert_eq!(p.validate(), Err(ValidationError::ZeroInterval));
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.title = "   ".into();
        assert_eq!(p.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_validate_weekly_weekday_set() {
        let mut p = sample_pattern(RecurrenceRule::Weekly {
            interval: 1,
            weekdays: vec![],
        });
        assert_eq!(p.validate(), Err(ValidationError::EmptyWeekdaySet));

        p.rule = RecurrenceRule::Weekly { interval: 1, weekdays: vec![0, 7] };
        assert_eq!(p.validate(), Err(ValidationError::WeekdayOutOfRange(7)));

        p.rule = RecurrenceRule::Weekly { interval: 1, weekdays: vec![2, 0, 2] };
        assert_eq!(p.validate(), Err(ValidationError::DuplicateWeekday(2)));
    }

    #[test]
    fn test_validate_sorts_weekdays() {
        let mut p = sample_pattern(RecurrenceRule::Weekly {
            interval: 1,
            weekdays: vec![4, 0, 2],
        });
        assert!(p.validate().is_ok());
        match &p.rule {
            RecurrenceRule::Weekly { weekdays, .. } => assert_eq!(weekdays, &vec![0, 2, 4]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_validate_month_targets() {
        let mut p = sample_pattern(RecurrenceRule::Monthly {
            interval: 1,
            day: MonthTarget::Fixed(0),
        });
        assert_eq!(p.validate(), Err(ValidationError::DayOutOfRange(0)));

        p.rule = RecurrenceRule::Monthly { interval: 1, day: MonthTarget::Fixed(32) };
        assert_eq!(p.validate(), Err(ValidationError::DayOutOfRange(32)));

        p.rule = RecurrenceRule::Yearly {
            interval: 1,
            month: 13,
            day: MonthTarget::Fixed(1),
        };
        assert_eq!(p.validate(), Err(ValidationError::MonthOutOfRange(13)));

        p.rule = RecurrenceRule::Monthly {
            interval: 1,
            day: MonthTarget::Ordinal { week: WeekOfMonth::Last, weekday: 9 },
        };
        assert_eq!(p.validate(), Err(ValidationError::WeekdayOutOfRange(9)));
    }

    #[test]
    fn test_validate_end_condition() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.end = EndCondition::AfterCount { count: 0 };
        assert_eq!(p.validate(), Err(ValidationError::ZeroEndCount));
        p.end = EndCondition::AfterCount { count: 3 };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_count_exhausted() {
        let mut p = sample_pattern(RecurrenceRule::Daily { interval: 1 });
        p.end = EndCondition::AfterCount { count: 2 };
        assert!(!p.count_exhausted());
        p.generated_count = 2;
        assert!(p.count_exhausted());
        p.generated_count = 5;
        assert!(p.count_exhausted());
    }
}
