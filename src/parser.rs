use std::collections::BTreeSet;

use tracing::debug;

use crate::error::CronParsingError;
use crate::grammar::{check_step, CharClass, FieldKind};
use crate::models::{FieldSpec, Schedule};
use crate::validator;

/// Parses `second minute hour day-of-month month day-of-week year`.
pub struct CronParser {
    fields: [FieldKind; 7],
}

impl Default for CronParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CronParser {
    pub fn new() -> Self {
        Self {
            fields: FieldKind::ALL,
        }
    }

    pub fn parse(&self, expr: &str) -> Result<Schedule, CronParsingError> {
        let result = self.parse_fields(expr).and_then(validator::validate);
        match &result {
            Ok(_) => debug!(expr, "parsed cron expression"),
            Err(e) => debug!(expr, error = %e, "rejected cron expression"),
        }
        result
    }

    fn parse_fields(&self, expr: &str) -> Result<Vec<FieldSpec>, CronParsingError> {
        let parts: Vec<&str> = expr.split_whitespace().collect();

        if parts.is_empty() {
            return Err(CronParsingError::Empty);
        }
        if parts.len() != self.fields.len() {
            return Err(CronParsingError::FieldCount(parts.len()));
        }

        self.fields
            .iter()
            .zip(parts)
            .map(|(kind, part)| self.parse_field(part, *kind))
            .collect()
    }

    /// Parses one field in isolation. Cross-field rules (day exclusivity)
    /// are left to the validator.
    pub fn parse_field(&self, text: &str, kind: FieldKind) -> Result<FieldSpec, CronParsingError> {
        let token = text.trim().to_ascii_uppercase();
        if token.is_empty() {
            return Err(CronParsingError::syntax(kind, text, "field is empty"));
        }

        for c in token.chars() {
            match kind.classify(c) {
                CharClass::Allowed => {}
                CharClass::Modifier => {
                    return Err(CronParsingError::modifier(
                        kind,
                        text,
                        format!("'{}' is not supported in the {} field", c, kind),
                    ))
                }
                CharClass::Invalid => {
                    return Err(CronParsingError::syntax(
                        kind,
                        text,
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        match token.as_str() {
            "*" => return Ok(FieldSpec::Wildcard),
            "?" => return Ok(FieldSpec::Unspecified),
            _ => {}
        }

        let items: Vec<&str> = token.split(',').collect();
        if items.iter().any(|item| has_modifier(item, kind)) {
            if items.len() > 1 || token.contains('-') || token.contains('/') {
                return Err(CronParsingError::modifier(
                    kind,
                    text,
                    "L, W and # must be the whole field, not part of a list, range or step",
                ));
            }
            return self.parse_modifier(&token, text, kind);
        }

        if items.len() == 1 && token.contains('/') {
            let (start, interval) = self.parse_step(&token, text, kind)?;
            return Ok(FieldSpec::Step { start, interval });
        }

        let mut values = BTreeSet::new();
        for item in items {
            self.parse_list_item(item, text, kind, &mut values)?;
        }
        Ok(FieldSpec::Explicit(values))
    }

    fn parse_modifier(
        &self,
        token: &str,
        text: &str,
        kind: FieldKind,
    ) -> Result<FieldSpec, CronParsingError> {
        if let Some((day, nth)) = token.split_once('#') {
            let weekday = kind.normalize(self.parse_value(day, text, kind)?);
            let nth = self.parse_number(nth, text, kind)?;
            if !(1..=5).contains(&nth) {
                return Err(CronParsingError::modifier(
                    kind,
                    text,
                    format!("occurrence {} must be between 1 and 5", nth),
                ));
            }
            return Ok(FieldSpec::NthWeekday { weekday, nth });
        }

        match kind {
            FieldKind::DayOfMonth if token == "L" => Ok(FieldSpec::LastDayOfMonth),
            FieldKind::DayOfMonth => match token.strip_suffix('W') {
                Some(day) => {
                    let day = self.parse_value(day, text, kind)?;
                    Ok(FieldSpec::NearestWeekday(day))
                }
                None => Err(CronParsingError::modifier(
                    kind,
                    text,
                    "L must stand alone in the day-of-month field",
                )),
            },
            FieldKind::DayOfWeek => match token.strip_suffix('L') {
                // bare L is the last Saturday
                Some("") => Ok(FieldSpec::LastWeekday(6)),
                Some(day) => {
                    let weekday = kind.normalize(self.parse_value(day, text, kind)?);
                    Ok(FieldSpec::LastWeekday(weekday))
                }
                None => Err(CronParsingError::modifier(
                    kind,
                    text,
                    "W is only supported in the day-of-month field",
                )),
            },
            _ => Err(CronParsingError::modifier(
                kind,
                text,
                format!("modifiers are not supported in the {} field", kind),
            )),
        }
    }

    fn parse_step(
        &self,
        part: &str,
        text: &str,
        kind: FieldKind,
    ) -> Result<(Option<u32>, u32), CronParsingError> {
        let (base, interval) = match part.split_once('/') {
            Some(pair) => pair,
            None => return Err(CronParsingError::syntax(kind, text, "malformed step")),
        };
        if base.contains('-') || interval.contains('/') {
            return Err(CronParsingError::syntax(
                kind,
                text,
                "step base must be '*' or a single value",
            ));
        }

        let start = match base {
            "*" => None,
            _ => Some(kind.normalize(self.parse_value(base, text, kind)?)),
        };
        let interval = self.parse_number(interval, text, kind)?;
        check_step(kind, text, interval)?;
        Ok((start, interval))
    }

    fn parse_list_item(
        &self,
        item: &str,
        text: &str,
        kind: FieldKind,
        values: &mut BTreeSet<u32>,
    ) -> Result<(), CronParsingError> {
        if item == "*" {
            let (min, max) = kind.domain();
            values.extend(min..=max);
        } else if item == "?" {
            return Err(CronParsingError::syntax(kind, text, "'?' cannot be part of a list"));
        } else if item.contains('/') {
            let (start, interval) = self.parse_step(item, text, kind)?;
            values.extend(FieldSpec::Step { start, interval }.values(kind));
        } else if let Some((low, high)) = item.split_once('-') {
            let low = self.parse_value(low, text, kind)?;
            let high = self.parse_value(high, text, kind)?;
            if low > high {
                return Err(CronParsingError::syntax(
                    kind,
                    text,
                    format!("invalid range {}-{}: start is after end", low, high),
                ));
            }
            values.extend((low..=high).map(|v| kind.normalize(v)));
        } else {
            let value = self.parse_value(item, text, kind)?;
            values.insert(kind.normalize(value));
        }
        Ok(())
    }

    /// A literal or a symbolic name, checked against the field bounds.
    fn parse_value(&self, part: &str, text: &str, kind: FieldKind) -> Result<u32, CronParsingError> {
        let value = if part.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            let (names, offset) = kind.names().ok_or_else(|| {
                CronParsingError::syntax(kind, text, format!("unexpected name '{}'", part))
            })?;
            let index = names.iter().position(|name| *name == part).ok_or_else(|| {
                CronParsingError::syntax(kind, text, format!("unknown name '{}'", part))
            })?;
            index as u32 + offset
        } else {
            self.parse_number(part, text, kind)?
        };

        let (min, max) = kind.bounds();
        if value < min || value > max {
            return Err(CronParsingError::domain(kind, text, value));
        }
        Ok(value)
    }

    fn parse_number(&self, part: &str, text: &str, kind: FieldKind) -> Result<u32, CronParsingError> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(CronParsingError::syntax(
                kind,
                text,
                format!("expected a number, got '{}'", part),
            ));
        }
        // digits only, so the only failure left is overflow
        part.parse::<u32>()
            .map_err(|_| CronParsingError::domain(kind, text, u32::MAX))
    }
}

/// Whether a list item uses L, W or #. Month names such as JUL end in an
/// L, so for months only a numeric item counts.
fn has_modifier(item: &str, kind: FieldKind) -> bool {
    let suffixed = item.ends_with('L') || item.ends_with('W');
    let numeric = item.starts_with(|c: char| c.is_ascii_digit());
    item.contains('#') || item == "L" || (suffixed && (numeric || kind != FieldKind::Month))
}
