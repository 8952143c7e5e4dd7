//! Human-readable schedule descriptions.
//!
//! Localized wording belongs to downstream formatters; this module defines
//! the seam they plug into and a plain English rendering built on the
//! `Display` impls below.

use std::fmt;

use jiff::civil::Time;

use crate::manager::Occurrence;
use crate::plan::*;
use crate::spec::{RecurrenceSpec, Weekday};

/// Renders a validated spec together with one of its occurrences.
pub trait DescriptionFormatter {
    fn describe(&self, spec: &RecurrenceSpec, occurrence: &Occurrence<'_>) -> String;
}

/// Untranslated English, e.g.
/// `every 2 months on the 3rd at 00:00 starting 2025-06-11; next on 2025-08-03 at 00:00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEnglish;

impl DescriptionFormatter for PlainEnglish {
    fn describe(&self, spec: &RecurrenceSpec, occurrence: &Occurrence<'_>) -> String {
        let at = occurrence.at.datetime();
        let next = format!("next on {} at {}", at.date(), TimeDisplay(at.time()));
        match Plan::compile(spec) {
            Ok(plan) => format!("{plan}; {next}"),
            Err(_) => next,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Once { at } => write!(f, "once on {} at {}", at.date(), TimeDisplay(at.time())),
            Plan::Recurring(rec) => {
                write!(f, "{}{}", rec.dates, rec.times)?;
                write!(f, " starting {}", rec.window.anchor)?;
                if let Some(horizon) = rec.window.horizon {
                    write!(f, " until {horizon}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatePattern::Daily { step_days } => write_every(f, *step_days, "day", "days"),
            DatePattern::Weekly {
                step_weeks,
                weekdays,
            } => {
                write_every(f, *step_weeks, "week", "weeks")?;
                write!(f, " on ")?;
                write_day_list(f, weekdays)
            }
            DatePattern::MonthlyByDay {
                day_of_month,
                step_months,
            } => {
                write_every(f, *step_months, "month", "months")?;
                write!(f, " on the {}{}", day_of_month, ordinal_suffix(*day_of_month))
            }
            DatePattern::MonthlyByOrdinal {
                ordinal,
                class,
                step_months,
            } => {
                write_every(f, *step_months, "month", "months")?;
                write!(f, " on the {} {}", ordinal.as_str(), class.as_str())
            }
        }
    }
}

impl fmt::Display for DayTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayTimes::At(t) => write!(f, " at {}", TimeDisplay(*t)),
            DayTimes::Every(step) => {
                if step.count == 1 {
                    write!(f, " every {}", step.unit.singular())?;
                } else {
                    write!(f, " every {} {}", step.count, step.unit.as_str())?;
                }
                write!(
                    f,
                    " from {} to {}",
                    TimeDisplay(step.start),
                    TimeDisplay(step.end)
                )
            }
        }
    }
}

/// `HH:MM`, or `HH:MM:SS` when seconds are set.
struct TimeDisplay(Time);

impl fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        write!(f, "{:02}:{:02}", t.hour(), t.minute())?;
        if t.second() != 0 {
            write!(f, ":{:02}", t.second())?;
        }
        Ok(())
    }
}

fn write_every(f: &mut fmt::Formatter<'_>, n: u32, one: &str, many: &str) -> fmt::Result {
    if n == 1 {
        write!(f, "every {one}")
    } else {
        write!(f, "every {n} {many}")
    }
}

fn write_day_list(f: &mut fmt::Formatter<'_>, days: &[Weekday]) -> fmt::Result {
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", day.as_str())?;
    }
    Ok(())
}

fn ordinal_suffix(n: u8) -> &'static str {
    match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
