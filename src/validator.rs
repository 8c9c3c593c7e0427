use crate::error::CronParsingError;
use crate::grammar::{check_step, FieldKind};
use crate::models::{FieldSpec, Schedule};

/// Cross-field checks run once every field has parsed on its own. A
/// schedule is only built when all of them pass.
pub fn validate(fields: Vec<FieldSpec>) -> Result<Schedule, CronParsingError> {
    let fields: [FieldSpec; 7] = fields
        .try_into()
        .map_err(|rest: Vec<FieldSpec>| CronParsingError::FieldCount(rest.len()))?;

    for kind in FieldKind::ALL {
        check_field(kind, &fields[kind.index()])?;
    }
    check_day_fields(
        &fields[FieldKind::DayOfMonth.index()],
        &fields[FieldKind::DayOfWeek.index()],
    )?;

    // An explicit year entirely in the past is legal; it just never matches.
    Ok(Schedule::new(fields))
}

fn check_day_fields(day_of_month: &FieldSpec, day_of_week: &FieldSpec) -> Result<(), CronParsingError> {
    let reason = match (day_of_month, day_of_week) {
        (FieldSpec::Unspecified, FieldSpec::Unspecified) => "both day fields are '?'",
        (dom, dow) if dom.is_concrete() && dow.is_concrete() => {
            "day-of-month and day-of-week cannot both be set; use '?' for one of them"
        }
        _ => return Ok(()),
    };
    Err(CronParsingError::Ambiguous {
        day_of_month: describe(day_of_month),
        day_of_week: describe(day_of_week),
        reason: reason.to_string(),
    })
}

/// Re-checks that every resolved value still lies inside the field.
fn check_field(kind: FieldKind, spec: &FieldSpec) -> Result<(), CronParsingError> {
    let (min, max) = kind.domain();
    let token = describe(spec);
    let in_domain = |value: u32| {
        if value < min || value > max {
            Err(CronParsingError::domain(kind, &token, value))
        } else {
            Ok(())
        }
    };
    let misplaced = || -> Result<(), CronParsingError> {
        Err(CronParsingError::modifier(
            kind,
            &token,
            format!("not supported in the {} field", kind),
        ))
    };

    match spec {
        FieldSpec::Wildcard => Ok(()),
        FieldSpec::Unspecified if kind.allows_unspecified() => Ok(()),
        FieldSpec::Explicit(values) if values.is_empty() => {
            Err(CronParsingError::syntax(kind, &token, "no values"))
        }
        FieldSpec::Explicit(values) => values.iter().try_for_each(|v| in_domain(*v)),
        FieldSpec::Step { start, interval } => {
            check_step(kind, &token, *interval)?;
            start.map_or(Ok(()), in_domain)
        }
        FieldSpec::LastDayOfMonth if kind == FieldKind::DayOfMonth => Ok(()),
        FieldSpec::NearestWeekday(day) if kind == FieldKind::DayOfMonth => in_domain(*day),
        FieldSpec::NthWeekday { weekday, nth } if kind == FieldKind::DayOfWeek => {
            in_domain(*weekday)?;
            if (1..=5).contains(nth) {
                Ok(())
            } else {
                Err(CronParsingError::modifier(kind, &token, "occurrence must be between 1 and 5"))
            }
        }
        FieldSpec::LastWeekday(weekday) if kind == FieldKind::DayOfWeek => in_domain(*weekday),
        FieldSpec::Unspecified
        | FieldSpec::LastDayOfMonth
        | FieldSpec::NearestWeekday(_)
        | FieldSpec::NthWeekday { .. }
        | FieldSpec::LastWeekday(_) => misplaced(),
    }
}

/// Renders a spec back into field syntax for error messages.
fn describe(spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Wildcard => "*".to_string(),
        FieldSpec::Unspecified => "?".to_string(),
        FieldSpec::Explicit(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(","),
        FieldSpec::Step { start: None, interval } => format!("*/{}", interval),
        FieldSpec::Step {
            start: Some(start),
            interval,
        } => format!("{}/{}", start, interval),
        FieldSpec::LastDayOfMonth => "L".to_string(),
        FieldSpec::NearestWeekday(day) => format!("{}W", day),
        FieldSpec::NthWeekday { weekday, nth } => format!("{}#{}", weekday, nth),
        FieldSpec::LastWeekday(weekday) => format!("{}L", weekday),
    }
}
