//! Compiled schedules.
//!
//! A [`Plan`] is the typed form of a validated [`RecurrenceSpec`]: each
//! variant carries only what its generator and time applier need, so every
//! `match` over it is checked for exhaustiveness by the compiler.

use jiff::civil::{Date, DateTime, Time};

use crate::error::ScheduleError;
use crate::spec::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Once { at: DateTime },
    Recurring(RecurringPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringPlan {
    pub window: Window,
    pub dates: DatePattern,
    pub times: DayTimes,
}

/// The bounds of a recurring schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub anchor: Date,
    pub horizon: Option<Date>,
    pub watermark: DateTime,
}

/// Which dates a recurring plan fires on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePattern {
    Daily {
        step_days: u32,
    },
    Weekly {
        step_weeks: u32,
        weekdays: Vec<Weekday>,
    },
    MonthlyByDay {
        day_of_month: u8,
        step_months: u32,
    },
    MonthlyByOrdinal {
        ordinal: Ordinal,
        class: WeekdayClass,
        step_months: u32,
    },
}

/// Which times of day a generated date expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTimes {
    At(Time),
    Every(TimeStep),
}

/// `start..=end` every `count` `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    pub start: Time,
    pub end: Time,
    pub unit: StepUnit,
    pub count: u32,
}

impl TimeStep {
    /// Step length in seconds.
    pub fn seconds(&self) -> i64 {
        self.unit.seconds() * i64::from(self.count)
    }
}

impl Plan {
    /// Map a spec's discriminants onto a generator/applier pairing.
    ///
    /// Validation guarantees this succeeds; a spec that skipped validation
    /// and carries an unmappable combination gets
    /// [`ScheduleError::Unsupported`].
    pub fn compile(spec: &RecurrenceSpec) -> Result<Self, ScheduleError> {
        match &spec.kind {
            SpecKind::Once(OnceSpec { event_at: Some(at) }) => Ok(Plan::Once { at: *at }),
            SpecKind::Once(OnceSpec { event_at: None }) => {
                Err(ScheduleError::unsupported("once without an event time"))
            }
            SpecKind::Recurring(rec) => {
                let window = Window {
                    anchor: rec.anchor,
                    horizon: rec.horizon,
                    watermark: rec.watermark,
                };
                Ok(Plan::Recurring(RecurringPlan {
                    window,
                    dates: compile_pattern(&rec.pattern)?,
                    times: compile_daily(&rec.daily)?,
                }))
            }
        }
    }

    pub fn as_recurring(&self) -> Option<&RecurringPlan> {
        match self {
            Plan::Recurring(r) => Some(r),
            Plan::Once { .. } => None,
        }
    }
}

fn compile_pattern(pattern: &Pattern) -> Result<DatePattern, ScheduleError> {
    match pattern {
        Pattern::Daily { step_days } => Ok(DatePattern::Daily {
            step_days: *step_days,
        }),
        Pattern::Weekly {
            step_weeks,
            weekdays,
        } => Ok(DatePattern::Weekly {
            step_weeks: *step_weeks,
            weekdays: weekdays.clone(),
        }),
        Pattern::Monthly(MonthlySpec {
            by_day: Some(by_day),
            by_ordinal: None,
        }) => Ok(DatePattern::MonthlyByDay {
            day_of_month: by_day.day_of_month,
            step_months: by_day.step_months,
        }),
        Pattern::Monthly(MonthlySpec {
            by_day: None,
            by_ordinal:
                Some(ByOrdinalWeekday {
                    ordinal: Some(ordinal),
                    weekday_class: Some(class),
                    step_months,
                }),
        }) => Ok(DatePattern::MonthlyByOrdinal {
            ordinal: *ordinal,
            class: *class,
            step_months: *step_months,
        }),
        Pattern::Monthly(MonthlySpec {
            by_day: Some(_),
            by_ordinal: Some(_),
        }) => Err(ScheduleError::unsupported(
            "monthly with both day-of-month and ordinal weekday",
        )),
        Pattern::Monthly(MonthlySpec {
            by_day: None,
            by_ordinal: Some(_),
        }) => Err(ScheduleError::unsupported(
            "monthly ordinal weekday without ordinal or weekday class",
        )),
        Pattern::Monthly(MonthlySpec {
            by_day: None,
            by_ordinal: None,
        }) => Err(ScheduleError::unsupported("monthly without a mode")),
    }
}

fn compile_daily(daily: &DailyMode) -> Result<DayTimes, ScheduleError> {
    match (daily.at, daily.range) {
        (Some(at), None) => Ok(DayTimes::At(at)),
        (
            None,
            Some(TimeRange {
                start: Some(start),
                end: Some(end),
                unit: Some(unit),
                step,
            }),
        ) => Ok(DayTimes::Every(TimeStep {
            start,
            end,
            unit,
            count: step,
        })),
        (None, Some(_)) => Err(ScheduleError::unsupported(
            "time range without start, end or unit",
        )),
        (Some(_), Some(_)) => Err(ScheduleError::unsupported(
            "time of day together with a time range",
        )),
        (None, None) => Err(ScheduleError::unsupported(
            "neither a time of day nor a time range",
        )),
    }
}
