//! Spec validation.
//!
//! Rule groups run in a fixed order and every group runs to completion, so a
//! single call reports every problem with a spec. A group only stops early
//! inside a branch whose prerequisite is missing (no weekdays means there is
//! nothing to check for duplicates); sibling branches still run.
//!
//! ```text
//! common ──┬── once
//!          └── recurring window ── daily mode ──┬── daily
//!                                               ├── weekly
//!                                               └── monthly ──┬── by day
//!                                                             └── by ordinal
//! ```

use std::collections::HashSet;

use jiff::civil::Date;

use crate::config::EngineConfig;
use crate::error::{ScheduleError, Violation, Violations};
use crate::spec::*;

/// Result of validating a spec. Never an error: problems are data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<'a> {
    Valid(&'a RecurrenceSpec),
    Invalid(Violations),
}

impl<'a> ValidationOutcome<'a> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(v) => Some(v),
        }
    }

    pub fn into_result(self) -> Result<&'a RecurrenceSpec, ScheduleError> {
        match self {
            Self::Valid(spec) => Ok(spec),
            Self::Invalid(v) => Err(ScheduleError::Invalid(v)),
        }
    }
}

/// Validate `spec` against `config`. `max_occurrences` is the caller's
/// occurrence cap, if any.
pub fn validate<'a>(
    config: &EngineConfig,
    spec: &'a RecurrenceSpec,
    max_occurrences: Option<u32>,
) -> ValidationOutcome<'a> {
    let mut rules = Rules::new(config);
    rules.common(spec, max_occurrences);
    match &spec.kind {
        SpecKind::Once(once) => rules.once(once),
        SpecKind::Recurring(rec) => {
            rules.window(rec, max_occurrences);
            rules.daily_mode(&rec.daily);
            match &rec.pattern {
                Pattern::Daily { step_days } => rules.step("pattern.step_days", *step_days),
                Pattern::Weekly {
                    step_weeks,
                    weekdays,
                } => rules.weekly(*step_weeks, weekdays),
                Pattern::Monthly(monthly) => rules.monthly(monthly),
            }
        }
    }

    if rules.found.is_empty() {
        ValidationOutcome::Valid(spec)
    } else {
        tracing::debug!(count = rules.found.len(), "spec rejected");
        ValidationOutcome::Invalid(Violations(rules.found))
    }
}

struct Rules<'c> {
    config: &'c EngineConfig,
    found: Vec<Violation>,
}

impl<'c> Rules<'c> {
    fn new(config: &'c EngineConfig) -> Self {
        Self {
            config,
            found: Vec::new(),
        }
    }

    fn report(&mut self, field: &'static str, message: impl Into<String>) {
        self.found.push(Violation::new(field, message));
    }

    fn common(&mut self, spec: &RecurrenceSpec, max_occurrences: Option<u32>) {
        if !spec.enabled {
            self.report("enabled", "schedule is disabled");
        }
        if !self.config.supports_locale(&spec.locale) {
            self.report("locale", format!("unsupported locale '{}'", spec.locale));
        }
        if spec.timezone.trim().is_empty() {
            self.report("timezone", "timezone is required");
        }
        if max_occurrences == Some(0) {
            self.report("max_occurrences", "occurrence cap must be at least 1");
        }
    }

    fn once(&mut self, once: &OnceSpec) {
        if once.event_at.is_none() {
            self.report("event_at", "event time is required");
        }
    }

    fn window(&mut self, rec: &RecurringSpec, max_occurrences: Option<u32>) {
        if rec.horizon.is_none() && max_occurrences.is_none() {
            self.report(
                "horizon",
                "a horizon date or an occurrence cap is required",
            );
        }
        if is_extreme(rec.anchor) {
            self.report("anchor", "anchor date is out of range");
        }
        let Some(horizon) = rec.horizon else {
            return;
        };
        if is_extreme(horizon) {
            self.report("horizon", "horizon date is out of range");
        }
        if horizon < rec.anchor {
            self.report("horizon", "horizon date must not be before the anchor date");
        }
        if horizon < rec.watermark.date() {
            self.report("horizon", "horizon date must not be before the watermark");
        }
    }

    fn daily_mode(&mut self, daily: &DailyMode) {
        match (daily.at, &daily.range) {
            (None, None) => self.report("daily", "a time of day or a time range is required"),
            (Some(_), Some(_)) => self.report(
                "daily.at",
                "a time of day cannot be combined with a time range",
            ),
            _ => {}
        }
        let Some(range) = &daily.range else {
            return;
        };
        if range.unit.is_none() {
            self.report("daily.range.unit", "range step unit is required");
        }
        self.step("daily.range.step", range.step);
        if range.start.is_none() {
            self.report("daily.range.start", "range start time is required");
        }
        if range.end.is_none() {
            self.report("daily.range.end", "range end time is required");
        }
        if let (Some(start), Some(end)) = (range.start, range.end) {
            if start >= end {
                self.report(
                    "daily.range.end",
                    format!("range start {start} must be before range end {end}"),
                );
            }
        }
    }

    fn weekly(&mut self, step_weeks: u32, weekdays: &[Weekday]) {
        self.step("pattern.step_weeks", step_weeks);
        if weekdays.is_empty() {
            self.report("pattern.weekdays", "at least one weekday is required");
            return;
        }
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for wd in weekdays {
            if !seen.insert(*wd) && reported.insert(*wd) {
                self.report(
                    "pattern.weekdays",
                    format!("{} is listed more than once", wd.as_str()),
                );
            }
        }
    }

    fn monthly(&mut self, monthly: &MonthlySpec) {
        match (&monthly.by_day, &monthly.by_ordinal) {
            (None, None) => self.report(
                "pattern.monthly",
                "a day of month or an ordinal weekday is required",
            ),
            (Some(_), Some(_)) => self.report(
                "pattern.monthly",
                "day of month and ordinal weekday are mutually exclusive",
            ),
            _ => {}
        }
        if let Some(by_day) = &monthly.by_day {
            if !(1..=31).contains(&by_day.day_of_month) {
                self.report(
                    "pattern.by_day.day_of_month",
                    format!(
                        "day of month must be between 1 and 31, got {}",
                        by_day.day_of_month
                    ),
                );
            }
            self.step("pattern.by_day.step_months", by_day.step_months);
        }
        if let Some(by_ordinal) = &monthly.by_ordinal {
            if by_ordinal.ordinal.is_none() {
                self.report("pattern.by_ordinal.ordinal", "ordinal is required");
            }
            if by_ordinal.weekday_class.is_none() {
                self.report("pattern.by_ordinal.weekday_class", "weekday class is required");
            }
            self.step("pattern.by_ordinal.step_months", by_ordinal.step_months);
        }
    }

    fn step(&mut self, field: &'static str, value: u32) {
        if value < 1 {
            self.report(field, "step must be at least 1");
        } else if value > self.config.max_step {
            self.report(
                field,
                format!("step must be at most {}, got {value}", self.config.max_step),
            );
        }
    }
}

fn is_extreme(date: Date) -> bool {
    date == Date::MIN || date == Date::MAX
}
