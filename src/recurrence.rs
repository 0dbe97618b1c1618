//! Next-occurrence calculation.
//!
//! Pure calendar arithmetic: given a pattern and a reference date, find the
//! next date the rule matches strictly after the reference, or `None` when
//! the pattern is paused or its end condition suppresses the candidate.
//! Nothing here reads a clock or mutates the pattern, so every function is
//! deterministic and safe to call from any thread.
//!
//! Impossible dates never raise: a fixed day beyond the month's length is
//! clamped (day 31 in April becomes April 30, day 29 in a non-leap February
//! becomes February 28), and an ordinal week that a month lacks falls back
//! to the month's final occurrence of that weekday.

use chrono::{Datelike, Duration, NaiveDate};

use crate::fields::{PatternStatus, WeekOfMonth};
use crate::pattern::{EndCondition, MonthTarget, Pattern, RecurrenceRule};

/// Compute the next occurrence of `pattern` strictly after `after`.
///
/// Returns `None` for a paused pattern, an exhausted after-count end
/// condition, or a candidate past a by-date cutoff. Total over validated
/// patterns otherwise.
pub fn next_occurrence(pattern: &Pattern, after: NaiveDate) -> Option<NaiveDate> {
    if pattern.status == PatternStatus::Paused || pattern.count_exhausted() {
        return None;
    }
    let candidate = match &pattern.rule {
        RecurrenceRule::Daily { interval } => {
            after.checked_add_signed(Duration::days(*interval as i64))?
        }
        RecurrenceRule::Weekly { interval, weekdays } => {
            next_weekly(after, *interval, weekdays)?
        }
        RecurrenceRule::Monthly { interval, day } => next_monthly(after, *interval, *day)?,
        RecurrenceRule::Yearly { interval, month, day } => {
            next_yearly(after, *interval, *month, *day)?
        }
    };
    if let EndCondition::ByDate { date } = pattern.end {
        if candidate > date {
            return None;
        }
    }
    Some(candidate)
}

/// Earliest selected weekday strictly after `after`'s weekday this week,
/// else wrap to the first selected weekday `interval` weeks ahead.
fn next_weekly(after: NaiveDate, interval: u32, weekdays: &[u8]) -> Option<NaiveDate> {
    let current = after.weekday().num_days_from_monday() as u8;
    if let Some(&day) = weekdays.iter().find(|&&d| d > current) {
        return after.checked_add_signed(Duration::days((day - current) as i64));
    }
    let first = *weekdays.first()?;
    let mut delta = (7 - current as i64 + first as i64) % 7;
    if delta == 0 {
        delta = 7;
    }
    delta += (interval as i64 - 1) * 7;
    after.checked_add_signed(Duration::days(delta))
}

fn next_monthly(after: NaiveDate, interval: u32, day: MonthTarget) -> Option<NaiveDate> {
    match day {
        MonthTarget::Fixed(d) => next_monthly_fixed(after, interval, d),
        MonthTarget::Ordinal { week, weekday } => {
            let candidate =
                ordinal_weekday_in_month(after.year(), after.month(), week, weekday)?;
            if candidate > after {
                return Some(candidate);
            }
            let (y, m) = add_months(after.year(), after.month(), interval);
            ordinal_weekday_in_month(y, m, week, weekday)
        }
    }
}

fn next_monthly_fixed(after: NaiveDate, interval: u32, day: u32) -> Option<NaiveDate> {
    let candidate = clamped_date(after.year(), after.month(), day)?;
    if after.day() < candidate.day() {
        return Some(candidate);
    }
    let (y, m) = add_months(after.year(), after.month(), interval);
    clamped_date(y, m, day)
}

fn next_yearly(after: NaiveDate, interval: u32, month: u32, day: MonthTarget) -> Option<NaiveDate> {
    let candidate = month_target_date(after.year(), month, day)?;
    if candidate > after {
        return Some(candidate);
    }
    month_target_date(after.year() + interval as i32, month, day)
}

/// Resolve an addressing mode to a concrete date within `year`/`month`.
fn month_target_date(year: i32, month: u32, day: MonthTarget) -> Option<NaiveDate> {
    match day {
        MonthTarget::Fixed(d) => clamped_date(year, month, d),
        MonthTarget::Ordinal { week, weekday } => {
            ordinal_weekday_in_month(year, month, week, weekday)
        }
    }
}

/// "Nth weekday" search within one month. For positive weeks, the first
/// occurrence plus (n-1) weeks, stepping back a week if the month has no
/// nth occurrence; for `Last`, walk back from the month's final day.
fn ordinal_weekday_in_month(
    year: i32,
    month: u32,
    week: WeekOfMonth,
    weekday: u8,
) -> Option<NaiveDate> {
    let len = days_in_month(year, month);
    match week.ordinal() {
        Some(n) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let offset = (weekday as i64 + 7 - first.weekday().num_days_from_monday() as i64) % 7;
            let mut day = 1 + offset as u32 + (n - 1) * 7;
            while day > len {
                day -= 7;
            }
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => {
            let last = NaiveDate::from_ymd_opt(year, month, len)?;
            let back = (last.weekday().num_days_from_monday() as i64 + 7 - weekday as i64) % 7;
            NaiveDate::from_ymd_opt(year, month, len - back as u32)
        }
    }
}

/// Day `day` of the month, clamped to the month's actual length.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Number of days in a month, February leap-aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month out of range"),
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Step `months` months forward from `year`/`month`.
fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = year as i64 * 12 + (month as i64 - 1) + months as i64;
    ((total.div_euclid(12)) as i32, (total.rem_euclid(12) + 1) as u32)
}
