use thiserror::Error;

use crate::grammar::FieldKind;

/// Every way an expression can be rejected. Parsing is all-or-nothing, so
/// the first error found is the one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronParsingError {
    #[error("cron expression is empty")]
    Empty,

    #[error("expected 7 fields in cron expression, got {0}")]
    FieldCount(usize),

    #[error("invalid {field} field '{token}': {reason}")]
    Syntax {
        field: FieldKind,
        token: String,
        reason: String,
    },

    #[error("invalid value {value} in {field} field '{token}': allowed range is {min}-{max}")]
    Domain {
        field: FieldKind,
        token: String,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("invalid modifier in {field} field '{token}': {reason}")]
    ModifierMisuse {
        field: FieldKind,
        token: String,
        reason: String,
    },

    #[error("ambiguous day specification '{day_of_month} {day_of_week}': {reason}")]
    Ambiguous {
        day_of_month: String,
        day_of_week: String,
        reason: String,
    },
}

impl CronParsingError {
    pub(crate) fn syntax(field: FieldKind, token: &str, reason: impl Into<String>) -> Self {
        CronParsingError::Syntax {
            field,
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn modifier(field: FieldKind, token: &str, reason: impl Into<String>) -> Self {
        CronParsingError::ModifierMisuse {
            field,
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(field: FieldKind, token: &str, value: u32) -> Self {
        let (min, max) = field.bounds();
        CronParsingError::Domain {
            field,
            token: token.to_string(),
            value,
            min,
            max,
        }
    }

    /// The field the error was found in, if it is scoped to a single field.
    /// `Ambiguous` involves both day fields and yields `None`.
    pub fn field(&self) -> Option<FieldKind> {
        match self {
            CronParsingError::Syntax { field, .. }
            | CronParsingError::Domain { field, .. }
            | CronParsingError::ModifierMisuse { field, .. } => Some(*field),
            CronParsingError::Ambiguous { .. }
            | CronParsingError::Empty
            | CronParsingError::FieldCount(_) => None,
        }
    }
}
