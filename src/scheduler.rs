use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::trace;

use crate::calendar::{days_in_month, last_weekday, nearest_weekday, nth_weekday, weekday};
use crate::grammar::FieldKind;
use crate::models::{FieldSpec, Schedule};

/// Calendar position being aligned to the schedule. Components may run one
/// past their field's maximum while a carry is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Cursor {
    fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    fn to_datetime(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second,
        )
    }

    fn start_of_month(&mut self, year: i32, month: u32) {
        *self = Self {
            year,
            month,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        };
    }

    fn next_month(&mut self) {
        if self.month >= 12 {
            self.start_of_month(self.year + 1, 1);
        } else {
            self.start_of_month(self.year, self.month + 1);
        }
    }
}

/// Expanded value lists for the fields that do not depend on the month.
struct Plan {
    years: Vec<u32>,
    months: Vec<u32>,
    hours: Vec<u32>,
    minutes: Vec<u32>,
    seconds: Vec<u32>,
}

impl Plan {
    fn new(schedule: &Schedule) -> Self {
        Self {
            years: schedule.year().values(FieldKind::Year),
            months: schedule.month().values(FieldKind::Month),
            hours: schedule.hour().values(FieldKind::Hour),
            minutes: schedule.minute().values(FieldKind::Minute),
            seconds: schedule.second().values(FieldKind::Second),
        }
    }
}

fn at_or_after(values: &[u32], current: u32) -> Option<u32> {
    values.iter().copied().find(|v| *v >= current)
}

/// Finds the first instant strictly after `after` that matches `schedule`,
/// at one-second granularity.
///
/// Year and month are settled first; any move to another month restarts
/// the day and time at their minima. Inside a month the time is aligned
/// second, minute, hour in that order: a field that runs out of values
/// wraps to its minimum, resets every finer field and carries one unit
/// upward, while a field that only moves forward keeps the finer values it
/// already has. The day is then resolved against the concrete month.
///
/// Because the time is settled before the day, a move to a later day in the
/// same month keeps the aligned time: `0 0 * 15 * ? *` from 05:30 on the 1st
/// yields 06:00 on the 15th and skips 00:00 to 05:00 that day.
///
/// A day-of-month no month can hold (`30 FEB`) never matches; the search
/// runs to the year limit and returns `None`.
///
/// The search ends with `None` once the year passes the last permitted
/// year (2099 for a wildcard year field).
pub fn compute_next_run(schedule: &Schedule, after: NaiveDateTime) -> Option<NaiveDateTime> {
    let plan = Plan::new(schedule);
    let (first_second, first_minute, first_hour) = (
        *plan.seconds.first()?,
        *plan.minutes.first()?,
        *plan.hours.first()?,
    );

    let start = after
        .with_nanosecond(0)?
        .checked_add_signed(TimeDelta::seconds(1))?;
    let mut cursor = Cursor::from_datetime(start);

    loop {
        let year = u32::try_from(cursor.year).unwrap_or(0);
        if !plan.years.contains(&year) {
            let next_year = at_or_after(&plan.years, year)?;
            trace!(from = cursor.year, to = next_year, "year jump");
            cursor.start_of_month(next_year as i32, 1);
            continue;
        }

        if !plan.months.contains(&cursor.month) {
            match at_or_after(&plan.months, cursor.month) {
                Some(month) => cursor.start_of_month(cursor.year, month),
                None => cursor.start_of_month(cursor.year + 1, 1),
            }
            trace!(year = cursor.year, month = cursor.month, "month jump");
            continue;
        }

        match at_or_after(&plan.seconds, cursor.second) {
            Some(second) => cursor.second = second,
            None => {
                cursor.second = first_second;
                cursor.minute += 1;
            }
        }
        match at_or_after(&plan.minutes, cursor.minute) {
            Some(minute) => cursor.minute = minute,
            None => {
                cursor.minute = first_minute;
                cursor.second = first_second;
                cursor.hour += 1;
            }
        }
        match at_or_after(&plan.hours, cursor.hour) {
            Some(hour) => cursor.hour = hour,
            None => {
                cursor.hour = first_hour;
                cursor.minute = first_minute;
                cursor.second = first_second;
                cursor.day += 1;
            }
        }

        let days = day_candidates(schedule, cursor.year, cursor.month);
        match at_or_after(&days, cursor.day) {
            Some(day) => {
                cursor.day = day;
                return cursor.to_datetime();
            }
            None => {
                trace!(year = cursor.year, month = cursor.month, "day carry");
                cursor.next_month();
            }
        }
    }
}

/// Ascending days of the given month allowed by whichever day field is
/// concrete. When neither is, every day matches.
fn day_candidates(schedule: &Schedule, year: i32, month: u32) -> Vec<u32> {
    let (dom, dow) = (schedule.day_of_month(), schedule.day_of_week());
    if dom.is_concrete() {
        resolve_days(dom, FieldKind::DayOfMonth, year, month)
    } else if dow.is_concrete() {
        resolve_days(dow, FieldKind::DayOfWeek, year, month)
    } else {
        (1..=days_in_month(year, month)).collect()
    }
}

fn resolve_days(spec: &FieldSpec, kind: FieldKind, year: i32, month: u32) -> Vec<u32> {
    let last = days_in_month(year, month);
    match spec {
        FieldSpec::Wildcard | FieldSpec::Unspecified => (1..=last).collect(),
        FieldSpec::Explicit(_) | FieldSpec::Step { .. } if kind == FieldKind::DayOfWeek => {
            let weekdays = spec.values(kind);
            (1..=last)
                .filter(|day| weekdays.contains(&weekday(year, month, *day)))
                .collect()
        }
        // A range or list reaching past the month's end also matches the
        // last day (`29-31` in February is the 28th). A single day number
        // does not, so `31` skips 30-day months.
        FieldSpec::Explicit(days) if days.len() > 1 => {
            let mut days: Vec<u32> = days.iter().map(|d| (*d).min(last)).collect();
            days.dedup();
            days
        }
        FieldSpec::Explicit(_) | FieldSpec::Step { .. } => {
            spec.values(kind).into_iter().filter(|d| *d <= last).collect()
        }
        FieldSpec::LastDayOfMonth => vec![last],
        FieldSpec::NearestWeekday(day) => vec![nearest_weekday(year, month, *day)],
        FieldSpec::NthWeekday { weekday, nth } => vec![nth_weekday(year, month, *weekday, *nth)],
        FieldSpec::LastWeekday(weekday) => vec![last_weekday(year, month, *weekday)],
    }
}

/// Iterator over successive occurrences, each used as the reference for
/// the next lookup.
pub struct Occurrences<'a> {
    schedule: &'a Schedule,
    cursor: Option<NaiveDateTime>,
}

impl<'a> Occurrences<'a> {
    pub fn new(schedule: &'a Schedule, after: NaiveDateTime) -> Self {
        Self {
            schedule,
            cursor: Some(after),
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let next = compute_next_run(self.schedule, self.cursor?);
        self.cursor = next;
        next
    }
}
