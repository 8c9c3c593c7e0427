//! Gregorian month arithmetic. Weekdays are numbered 0 = Sunday .. 6 = Saturday.

use chrono::{Datelike, NaiveDate};

pub const SUNDAY: u32 = 0;
pub const SATURDAY: u32 = 6;

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Weekday of `day`, counted from the weekday of the 1st so that days past
/// the end of the month keep the weekly rhythm.
pub fn weekday(year: i32, month: u32, day: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .map_or(0, |date| date.weekday().num_days_from_sunday());
    (first + day - 1) % 7
}

/// Closest Monday-Friday to `day` without leaving the month. A day past
/// the month's end is clamped to the last day first.
pub fn nearest_weekday(year: i32, month: u32, day: u32) -> u32 {
    let last = days_in_month(year, month);
    let day = day.clamp(1, last);
    match weekday(year, month, day) {
        SATURDAY if day == 1 => 3,
        SATURDAY => day - 1,
        SUNDAY if day == last => day - 2,
        SUNDAY => day + 1,
        _ => day,
    }
}

/// The `nth` occurrence of `weekday` in the month.
///
/// When the month has fewer than `nth` occurrences the last one is
/// returned instead of skipping to a later month: `SUN#5` in February
/// 1998 (four Sundays) resolves to the 22nd.
pub fn nth_weekday(year: i32, month: u32, weekday_of: u32, nth: u32) -> u32 {
    let offset = (weekday_of + 7 - weekday(year, month, 1)) % 7;
    let day = 1 + offset + 7 * nth.saturating_sub(1);
    if day > days_in_month(year, month) {
        last_weekday(year, month, weekday_of)
    } else {
        day
    }
}

pub fn last_weekday(year: i32, month: u32, weekday_of: u32) -> u32 {
    let last = days_in_month(year, month);
    last - (weekday(year, month, last) + 7 - weekday_of) % 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_gregorian_rules() {
        assert!(is_leap_year(2016));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2017));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2017, 1), 31);
        assert_eq!(days_in_month(2017, 2), 28);
        assert_eq!(days_in_month(2016, 2), 29);
        assert_eq!(days_in_month(2017, 4), 30);
        assert_eq!(days_in_month(2017, 12), 31);
    }

    #[test]
    fn weekday_indexing() {
        // 2017-01-01 was a Sunday, 1998-01-31 a Saturday
        assert_eq!(weekday(2017, 1, 1), SUNDAY);
        assert_eq!(weekday(2017, 1, 2), 1);
        assert_eq!(weekday(1998, 1, 31), SATURDAY);
    }

    #[test]
    fn nearest_weekday_stays_inside_the_month() {
        // April 2017: 1st is a Saturday, 30th a Sunday
        assert_eq!(nearest_weekday(2017, 4, 1), 3);
        assert_eq!(nearest_weekday(2017, 4, 2), 3);
        assert_eq!(nearest_weekday(2017, 4, 29), 28);
        assert_eq!(nearest_weekday(2017, 4, 30), 28);
        assert_eq!(nearest_weekday(2017, 4, 31), 28);
        // Wednesday stays put
        assert_eq!(nearest_weekday(2017, 5, 3), 3);
        // May 28 2017 is a Sunday in the middle of the month
        assert_eq!(nearest_weekday(2017, 5, 28), 29);
    }

    #[test]
    fn nth_weekday_falls_back_to_last_occurrence() {
        // February 1998 starts on a Sunday and has four of them
        assert_eq!(nth_weekday(1998, 2, SUNDAY, 1), 1);
        assert_eq!(nth_weekday(1998, 2, SUNDAY, 2), 8);
        assert_eq!(nth_weekday(1998, 2, SUNDAY, 4), 22);
        assert_eq!(nth_weekday(1998, 2, SUNDAY, 5), 22);
        // March 1998 has five Sundays
        assert_eq!(nth_weekday(1998, 3, SUNDAY, 5), 29);
    }

    #[test]
    fn last_weekday_of_month() {
        assert_eq!(last_weekday(1998, 2, SUNDAY), 22);
        assert_eq!(last_weekday(1998, 2, SATURDAY), 28);
        assert_eq!(last_weekday(2017, 1, 2), 31);
    }
}
