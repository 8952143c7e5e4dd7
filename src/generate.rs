//! Date generators for each recurrence family.
//!
//! Every generator walks forward from the anchor one *step* at a time (a day,
//! a month) and reports the date that step selected, if any. [`Bounded`]
//! wraps the steps and is the single place that enforces the anchor and the
//! horizon, so all families agree on where a schedule starts and stops.

use jiff::civil::Date;
use jiff::Span;

use crate::calendar::{clamp_day, first_of_month_after, matching_days, select_by_ordinal};
use crate::error::ScheduleError;
use crate::plan::{DatePattern, Window};
use crate::spec::{Ordinal, Weekday, WeekdayClass};

/// One step of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Start of the stepped period (the day itself, or the 1st of the month).
    pub period: Date,
    /// The date the step selected; `None` skips the period.
    pub pick: Option<Date>,
}

type StepResult = Result<Step, ScheduleError>;

/// Candidate dates for `pattern`, in strictly increasing order, within `window`.
pub fn dates(pattern: &DatePattern, window: &Window) -> Bounded<Steps> {
    let steps = match pattern {
        DatePattern::Daily { step_days } => Steps::Daily(DailySteps::new(window.anchor, *step_days)),
        DatePattern::Weekly {
            step_weeks,
            weekdays,
        } => Steps::Weekly(WeeklySteps::new(window.anchor, *step_weeks, weekdays)),
        DatePattern::MonthlyByDay {
            day_of_month,
            step_months,
        } => Steps::MonthlyByDay(MonthlySteps::new(
            window.anchor,
            *step_months,
            MonthPick::Day(*day_of_month),
        )),
        DatePattern::MonthlyByOrdinal {
            ordinal,
            class,
            step_months,
        } => Steps::MonthlyByOrdinal(MonthlySteps::new(
            window.anchor,
            *step_months,
            MonthPick::Ordinal(*ordinal, *class),
        )),
    };
    Bounded::new(steps, window.anchor, window.horizon)
}

/// Drops picks before the anchor and ends at the first step past the horizon.
#[derive(Debug, Clone)]
pub struct Bounded<I> {
    inner: I,
    anchor: Date,
    horizon: Option<Date>,
    done: bool,
}

impl<I> Bounded<I> {
    pub fn new(inner: I, anchor: Date, horizon: Option<Date>) -> Self {
        Self {
            inner,
            anchor,
            horizon,
            done: false,
        }
    }

    fn past_horizon(&self, date: Date) -> bool {
        self.horizon.is_some_and(|h| date > h)
    }
}

impl<I: Iterator<Item = StepResult>> Iterator for Bounded<I> {
    type Item = Result<Date, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let step = match self.inner.next() {
                Some(Ok(step)) => step,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            if self.past_horizon(step.period) {
                self.done = true;
                return None;
            }
            let Some(date) = step.pick else {
                continue;
            };
            if date < self.anchor {
                continue;
            }
            if self.past_horizon(date) {
                self.done = true;
                return None;
            }
            return Some(Ok(date));
        }
    }
}

/// Static dispatch over the generator families.
#[derive(Debug, Clone)]
pub enum Steps {
    Daily(DailySteps),
    Weekly(WeeklySteps),
    MonthlyByDay(MonthlySteps),
    MonthlyByOrdinal(MonthlySteps),
}

impl Iterator for Steps {
    type Item = StepResult;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Steps::Daily(s) => s.next(),
            Steps::Weekly(s) => s.next(),
            Steps::MonthlyByDay(s) | Steps::MonthlyByOrdinal(s) => s.next(),
        }
    }
}

/// `anchor, anchor + n, anchor + 2n, ...`
#[derive(Debug, Clone)]
pub struct DailySteps {
    cursor: Option<Date>,
    step: Span,
}

impl DailySteps {
    pub fn new(anchor: Date, step_days: u32) -> Self {
        assert!(step_days >= 1, "daily step must be at least 1");
        Self {
            cursor: Some(anchor),
            step: Span::new().days(i64::from(step_days)),
        }
    }
}

impl Iterator for DailySteps {
    type Item = StepResult;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.cursor?;
        // Running off the end of the calendar ends the sequence.
        self.cursor = date.checked_add(self.step).ok();
        Some(Ok(Step {
            period: date,
            pick: Some(date),
        }))
    }
}

/// Day-by-day walk that skips `step_weeks - 1` whole weeks after each Sunday.
///
/// Weeks end on Sunday: the skip only happens once a Sunday has been
/// processed, so no weekday inside a selected week is ever stepped over.
#[derive(Debug, Clone)]
pub struct WeeklySteps {
    cursor: Option<Date>,
    skip: Span,
    weekdays: [bool; 7],
}

impl WeeklySteps {
    pub fn new(anchor: Date, step_weeks: u32, weekdays: &[Weekday]) -> Self {
        assert!(step_weeks >= 1, "weekly step must be at least 1");
        let mut selected = [false; 7];
        for wd in weekdays {
            selected[weekday_index(*wd)] = true;
        }
        Self {
            cursor: Some(anchor),
            skip: Span::new().days((i64::from(step_weeks) - 1) * 7),
            weekdays: selected,
        }
    }
}

fn weekday_index(wd: Weekday) -> usize {
    wd.to_jiff().to_monday_zero_offset() as usize
}

impl Iterator for WeeklySteps {
    type Item = StepResult;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.cursor?;
        let wd = Weekday::from_jiff(date.weekday());
        let mut next = date.tomorrow().ok();
        if wd == Weekday::Sunday {
            next = next.and_then(|d| d.checked_add(self.skip).ok());
        }
        self.cursor = next;
        let pick = self.weekdays[weekday_index(wd)].then_some(date);
        Some(Ok(Step { period: date, pick }))
    }
}

/// How a monthly generator chooses its day within each stepped month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthPick {
    /// Day of month, clamped to the month's length.
    Day(u8),
    /// Nth (or last) day of the month matching a weekday class.
    Ordinal(Ordinal, WeekdayClass),
}

impl MonthPick {
    fn pick(self, month_start: Date) -> Result<Option<Date>, ScheduleError> {
        let (year, month) = (month_start.year(), month_start.month());
        match self {
            MonthPick::Day(day) => clamp_day(year, month, day).map(Some),
            MonthPick::Ordinal(ordinal, class) => {
                Ok(select_by_ordinal(&matching_days(year, month, class), ordinal))
            }
        }
    }
}

/// The anchor's month, then every `step_months` months after it.
#[derive(Debug, Clone)]
pub struct MonthlySteps {
    anchor: Date,
    step_months: i64,
    index: i64,
    pick: MonthPick,
    done: bool,
}

impl MonthlySteps {
    pub fn new(anchor: Date, step_months: u32, pick: MonthPick) -> Self {
        assert!(step_months >= 1, "monthly step must be at least 1");
        Self {
            anchor,
            step_months: i64::from(step_months),
            index: 0,
            pick,
            done: false,
        }
    }
}

impl Iterator for MonthlySteps {
    type Item = StepResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // Offsets are taken from the anchor each time so clamping in one
        // month never shifts the next.
        let Ok(period) = first_of_month_after(self.anchor, self.index * self.step_months) else {
            self.done = true;
            return None;
        };
        self.index += 1;
        match self.pick.pick(period) {
            Ok(pick) => Some(Ok(Step { period, pick })),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
