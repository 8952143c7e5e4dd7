//! Calendar primitives: month lengths, weekday classes, ordinal selection.

use jiff::civil::Date;
use jiff::Span;

use crate::error::ScheduleError;
use crate::spec::{Ordinal, Weekday, WeekdayClass};

/// Number of days in `month` of `year` (Gregorian, leap Februaries included).
///
/// # Panics
///
/// Panics if `month` is not in `1..=12`.
pub fn days_in_month(year: i16, month: i8) -> i8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => panic!("month out of range: {month}"),
    }
}

pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Whether `date`'s weekday belongs to `class`.
pub fn classify(date: Date, class: WeekdayClass) -> bool {
    let wd = Weekday::from_jiff(date.weekday());
    match class {
        WeekdayClass::Day(day) => wd == day,
        WeekdayClass::AnyDay => true,
        WeekdayClass::Weekday => !wd.is_weekend(),
        WeekdayClass::WeekendDay => wd.is_weekend(),
    }
}

/// Pick the `ordinal`-th entry of an ascending list of a month's matching days.
///
/// Returns `None` when the list is too short; `Last` takes the final entry.
pub fn select_by_ordinal(matching: &[Date], ordinal: Ordinal) -> Option<Date> {
    let index = match ordinal {
        Ordinal::First => 0,
        Ordinal::Second => 1,
        Ordinal::Third => 2,
        Ordinal::Fourth => 3,
        Ordinal::Last => return matching.last().copied(),
    };
    matching.get(index).copied()
}

/// All days of the month that satisfy `class`, in ascending order.
pub fn matching_days(year: i16, month: i8, class: WeekdayClass) -> Vec<Date> {
    (1..=days_in_month(year, month))
        .filter_map(|day| Date::new(year, month, day).ok())
        .filter(|d| classify(*d, class))
        .collect()
}

/// `day` in the given month, clamped to the month's last day.
pub fn clamp_day(year: i16, month: i8, day: u8) -> Result<Date, ScheduleError> {
    let last = days_in_month(year, month);
    let day = i8::try_from(day).unwrap_or(i8::MAX).min(last);
    Ok(Date::new(year, month, day)?)
}

/// The first day of the month `months` months after `date`'s month.
pub fn first_of_month_after(date: Date, months: i64) -> Result<Date, ScheduleError> {
    Ok(date.first_of_month().checked_add(Span::new().months(months))?)
}
