//! Human-readable one-line summaries of recurrence rules.
//!
//! Fixed grammar consumed by the list/view output: "Daily", "Every 3 days",
//! "Weekly on Mon, Wed, Fri", "Monthly on the 15th", "Monthly on the last
//! Fri", "Yearly on Mar 15", "Every 2 years on the 3rd Mon of Jun".

use crate::fields::{format_weekday, ordinal_suffix, MONTH_NAMES};
use crate::pattern::{MonthTarget, Pattern, RecurrenceRule};

/// Render a pattern's rule as a fixed-grammar phrase.
pub fn summarize(pattern: &Pattern) -> String {
    match &pattern.rule {
        RecurrenceRule::Daily { interval } => match interval {
            1 => "Daily".into(),
            n => format!("Every {n} days"),
        },
        RecurrenceRule::Weekly { interval, weekdays } => {
            let days = weekdays
                .iter()
                .map(|&d| format_weekday(d))
                .collect::<Vec<_>>()
                .join(", ");
            match interval {
                1 => format!("Weekly on {days}"),
                n => format!("Every {n} weeks on {days}"),
            }
        }
        RecurrenceRule::Monthly { interval, day } => match interval {
            1 => format!("Monthly on the {}", month_target_phrase(*day)),
            n => format!("Every {n} months on the {}", month_target_phrase(*day)),
        },
        RecurrenceRule::Yearly { interval, month, day } => {
            let month_name = MONTH_NAMES
                .get(*month as usize - 1)
                .copied()
                .unwrap_or("?");
            let target = match day {
                MonthTarget::Fixed(d) => format!("{month_name} {d}"),
                MonthTarget::Ordinal { .. } => {
                    format!("the {} of {month_name}", month_target_phrase(*day))
                }
            };
            match interval {
                1 => format!("Yearly on {target}"),
                n => format!("Every {n} years on {target}"),
            }
        }
    }
}

/// "15th", "2nd Tue", "last Fri".
fn month_target_phrase(day: MonthTarget) -> String {
    match day {
        MonthTarget::Fixed(d) => format!("{d}{}", ordinal_suffix(d)),
        MonthTarget::Ordinal { week, weekday } => {
            let week_phrase = match week.ordinal() {
                Some(n) => format!("{n}{}", ordinal_suffix(n)),
                None => "last".into(),
            };
            format!("{week_phrase} {}", format_weekday(weekday))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::WeekOfMonth;
    use crate::pattern::sample_pattern;

    fn summary_of(rule: RecurrenceRule) -> String {
        summarize(&sample_pattern(rule))
    }

    #[test]
    fn test_daily_summaries() {
        assert_eq!(summary_of(RecurrenceRule::Daily { interval: 1 }), "Daily");
        assert_eq!(
            summary_of(RecurrenceRule::Daily { interval: 3 }),
            "Every 3 days"
        );
    }

    #[test]
    fn test_weekly_summaries() {
        assert_eq!(
            summary_of(RecurrenceRule::Weekly { interval: 1, weekdays: vec![0, 2, 4] }),
            "Weekly on Mon, Wed, Fri"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Weekly { interval: 2, weekdays: vec![0] }),
            "Every 2 weeks on Mon"
        );
    }

    #[test]
    fn test_monthly_summaries() {
        assert_eq!(
            summary_of(RecurrenceRule::Monthly { interval: 1, day: MonthTarget::Fixed(15) }),
            "Monthly on the 15th"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Monthly { interval: 1, day: MonthTarget::Fixed(31) }),
            "Monthly on the 31st"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Monthly {
                interval: 1,
                day: MonthTarget::Ordinal { week: WeekOfMonth::Second, weekday: 1 },
            }),
            "Monthly on the 2nd Tue"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Monthly {
                interval: 1,
                day: MonthTarget::Ordinal { week: WeekOfMonth::Last, weekday: 4 },
            }),
            "Monthly on the last Fri"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Monthly { interval: 6, day: MonthTarget::Fixed(1) }),
            "Every 6 months on the 1st"
        );
    }

    #[test]
    fn test_yearly_summaries() {
        assert_eq!(
            summary_of(RecurrenceRule::Yearly {
                interval: 1,
                month: 3,
                day: MonthTarget::Fixed(15),
            }),
            "Yearly on Mar 15"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Yearly {
                interval: 1,
                month: 6,
                day: MonthTarget::Ordinal { week: WeekOfMonth::Third, weekday: 0 },
            }),
            "Yearly on the 3rd Mon of Jun"
        );
        assert_eq!(
            summary_of(RecurrenceRule::Yearly {
                interval: 2,
                month: 12,
                day: MonthTarget::Fixed(31),
            }),
            "Every 2 years on Dec 31"
        );
    }
}
