use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::CronParsingError;
use crate::grammar::FieldKind;
use crate::parser::CronParser;
use crate::scheduler::{compute_next_run, Occurrences};

/// Parsed form of a single field.
///
/// Ranges and lists are expanded into `Explicit` while parsing, so a
/// range never survives as its own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    Wildcard,
    /// `?`: the field does not constrain the day.
    Unspecified,
    Explicit(BTreeSet<u32>),
    /// `*/n` (start `None`) or `a/n`.
    Step { start: Option<u32>, interval: u32 },
    /// `L` in day-of-month.
    LastDayOfMonth,
    /// `nW` in day-of-month.
    NearestWeekday(u32),
    /// `d#n` in day-of-week, weekday 0 = Sunday.
    NthWeekday { weekday: u32, nth: u32 },
    /// `dL` (or bare `L`) in day-of-week.
    LastWeekday(u32),
}

impl FieldSpec {
    /// Anything other than `*` and `?`.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, FieldSpec::Wildcard | FieldSpec::Unspecified)
    }

    /// Ascending matching values for set-like specifications. Day
    /// modifiers need a concrete month to resolve and yield nothing here.
    pub fn values(&self, kind: FieldKind) -> Vec<u32> {
        let (min, max) = kind.domain();
        match self {
            FieldSpec::Wildcard | FieldSpec::Unspecified => (min..=max).collect(),
            FieldSpec::Explicit(set) => set.iter().copied().collect(),
            FieldSpec::Step { start, interval } => (start.unwrap_or(min)..=max)
                .step_by(*interval as usize)
                .collect(),
            FieldSpec::LastDayOfMonth
            | FieldSpec::NearestWeekday(_)
            | FieldSpec::NthWeekday { .. }
            | FieldSpec::LastWeekday(_) => Vec::new(),
        }
    }
}

/// A validated seven-field expression. Immutable once built; lookups are
/// pure functions of the schedule and the reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    fields: [FieldSpec; 7],
}

impl Schedule {
    /// Only the validator builds schedules.
    pub(crate) fn new(fields: [FieldSpec; 7]) -> Self {
        Self { fields }
    }

    pub fn parse(expr: &str) -> Result<Self, CronParsingError> {
        CronParser::new().parse(expr)
    }

    pub fn field(&self, kind: FieldKind) -> &FieldSpec {
        &self.fields[kind.index()]
    }

    pub fn second(&self) -> &FieldSpec {
        self.field(FieldKind::Second)
    }

    pub fn minute(&self) -> &FieldSpec {
        self.field(FieldKind::Minute)
    }

    pub fn hour(&self) -> &FieldSpec {
        self.field(FieldKind::Hour)
    }

    pub fn day_of_month(&self) -> &FieldSpec {
        self.field(FieldKind::DayOfMonth)
    }

    pub fn month(&self) -> &FieldSpec {
        self.field(FieldKind::Month)
    }

    pub fn day_of_week(&self) -> &FieldSpec {
        self.field(FieldKind::DayOfWeek)
    }

    pub fn year(&self) -> &FieldSpec {
        self.field(FieldKind::Year)
    }

    /// First matching instant strictly after `after`, or `None` when the
    /// schedule has no further occurrence.
    pub fn next(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        compute_next_run(self, after)
    }

    /// Lazy sequence of occurrences after `after`, each fed back as the
    /// next reference.
    pub fn occurrences(&self, after: NaiveDateTime) -> Occurrences<'_> {
        Occurrences::new(self, after)
    }
}

impl FromStr for Schedule {
    type Err = CronParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schedule::parse(s)
    }
}
