use std::fmt;

use crate::error::CronParsingError;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// One of the seven whitespace-separated fields, in expression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Second,
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
        FieldKind::Year,
    ];

    /// Position of the field in the expression (0-based).
    pub fn index(self) -> usize {
        match self {
            FieldKind::Second => 0,
            FieldKind::Minute => 1,
            FieldKind::Hour => 2,
            FieldKind::DayOfMonth => 3,
            FieldKind::Month => 4,
            FieldKind::DayOfWeek => 5,
            FieldKind::Year => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Second => "second",
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
            FieldKind::Year => "year",
        }
    }

    /// Inclusive bounds a literal may take. Day-of-week accepts 7 as an
    /// alias of 0.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            FieldKind::Second | FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 7),
            FieldKind::Year => (1970, 2099),
        }
    }

    /// Inclusive range covered by `*` and step expansion.
    pub fn domain(self) -> (u32, u32) {
        match self {
            FieldKind::DayOfWeek => (0, 6),
            other => other.bounds(),
        }
    }

    /// Symbolic names and the value of the first name.
    pub fn names(self) -> Option<(&'static [&'static str], u32)> {
        match self {
            FieldKind::Month => Some((&MONTH_NAMES[..], 1)),
            FieldKind::DayOfWeek => Some((&WEEKDAY_NAMES[..], 0)),
            _ => None,
        }
    }

    /// Size of the wrap-around domain a step interval must divide.
    pub fn step_modulus(self) -> Option<u32> {
        match self {
            FieldKind::Second | FieldKind::Minute => Some(60),
            FieldKind::Hour => Some(24),
            _ => None,
        }
    }

    pub fn allows_unspecified(self) -> bool {
        matches!(self, FieldKind::DayOfMonth | FieldKind::DayOfWeek)
    }

    pub fn allows_last(self) -> bool {
        matches!(self, FieldKind::DayOfMonth | FieldKind::DayOfWeek)
    }

    pub fn allows_nearest_weekday(self) -> bool {
        self == FieldKind::DayOfMonth
    }

    pub fn allows_nth(self) -> bool {
        self == FieldKind::DayOfWeek
    }

    /// Classifies a character of an upper-cased field token.
    pub fn classify(self, c: char) -> CharClass {
        match c {
            '0'..='9' | '*' | ',' | '-' | '/' => CharClass::Allowed,
            '?' if self.allows_unspecified() => CharClass::Allowed,
            '#' if self.allows_nth() => CharClass::Allowed,
            '?' | '#' => CharClass::Modifier,
            'A'..='Z' if self.names().is_some() => CharClass::Allowed,
            'L' if self.allows_last() => CharClass::Allowed,
            'W' if self.allows_nearest_weekday() => CharClass::Allowed,
            'L' | 'W' => CharClass::Modifier,
            _ => CharClass::Invalid,
        }
    }

    /// Normalizes a value into the expansion domain (day-of-week 7 -> 0).
    pub fn normalize(self, value: u32) -> u32 {
        match self {
            FieldKind::DayOfWeek => value % 7,
            _ => value,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Allowed,
    /// A modifier character the field does not support.
    Modifier,
    Invalid,
}

/// Rejects step intervals that would drift across the field's wrap-around.
pub fn check_step(kind: FieldKind, token: &str, interval: u32) -> Result<(), CronParsingError> {
    if interval == 0 {
        return Err(CronParsingError::syntax(kind, token, "step interval must be at least 1"));
    }
    if let Some(modulus) = kind.step_modulus() {
        if modulus % interval != 0 {
            return Err(CronParsingError::syntax(
                kind,
                token,
                format!("step {} does not evenly divide {}", interval, modulus),
            ));
        }
    }
    Ok(())
}
