//! The schedule manager: validate, compile, generate, pick.

use jiff::Zoned;

use crate::apply::{OffsetResolver, Timestamps, TzdbResolver};
use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::generate;
use crate::plan::{DayTimes, Plan};
use crate::spec::RecurrenceSpec;
use crate::validate::{self, ValidationOutcome};

/// One concrete fire time, tied to the spec that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<'a> {
    /// Wall-clock time pinned to the offset in effect at that instant.
    pub at: Zoned,
    pub spec: &'a RecurrenceSpec,
}

/// Runs specs through validation and the matching generator and applier.
///
/// Holds no per-call state; share one across threads freely.
#[derive(Debug, Clone, Default)]
pub struct ScheduleManager<R = TzdbResolver> {
    config: EngineConfig,
    resolver: R,
}

impl ScheduleManager {
    /// Default configuration with the tzdb resolver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: OffsetResolver> ScheduleManager<R> {
    pub fn with_resolver(config: EngineConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    pub fn with_config(self, config: EngineConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check `spec` against every rule; see [`validate::validate`].
    pub fn validate<'a>(
        &self,
        spec: &'a RecurrenceSpec,
        max_occurrences: Option<u32>,
    ) -> ValidationOutcome<'a> {
        validate::validate(&self.config, spec, max_occurrences)
    }

    /// The full bounded schedule, from the anchor on.
    ///
    /// Bounded by the horizon and by `max_occurrences`, whichever comes
    /// first. Calling this twice with the same spec yields the same list.
    #[tracing::instrument(skip_all)]
    pub fn occurrences<'a>(
        &self,
        spec: &'a RecurrenceSpec,
        max_occurrences: Option<u32>,
    ) -> Result<Vec<Occurrence<'a>>, ScheduleError> {
        let plan = self.prepare(spec, max_occurrences)?;
        self.series(spec, &plan, max_occurrences)
            .map(|at| at.map(|at| Occurrence { at, spec }))
            .collect()
    }

    /// The first occurrence at or after the spec's watermark.
    #[tracing::instrument(skip_all)]
    pub fn next_execution<'a>(
        &self,
        spec: &'a RecurrenceSpec,
        max_occurrences: Option<u32>,
    ) -> Result<Occurrence<'a>, ScheduleError> {
        let plan = self.prepare(spec, max_occurrences)?;
        let watermark = plan.as_recurring().map(|r| r.window.watermark);
        for at in self.series(spec, &plan, max_occurrences) {
            let at = at?;
            if watermark.is_some_and(|w| at.datetime() < w) {
                continue;
            }
            tracing::debug!(%at, "next execution");
            return Ok(Occurrence { at, spec });
        }
        tracing::debug!("no next execution");
        Err(ScheduleError::NoOccurrence)
    }

    fn prepare(
        &self,
        spec: &RecurrenceSpec,
        max_occurrences: Option<u32>,
    ) -> Result<Plan, ScheduleError> {
        let spec = self.validate(spec, max_occurrences).into_result()?;
        let plan = Plan::compile(spec)?;
        tracing::debug!(?plan, "compiled");
        Ok(plan)
    }

    /// Generator and applier for `plan`, capped at `max_occurrences`.
    fn series<'s>(
        &'s self,
        spec: &'s RecurrenceSpec,
        plan: &Plan,
        max_occurrences: Option<u32>,
    ) -> impl Iterator<Item = Result<Zoned, ScheduleError>> + 's {
        let cap = max_occurrences.map_or(usize::MAX, |n| n as usize);
        let series: Box<dyn Iterator<Item = Result<Zoned, ScheduleError>> + 's> = match plan {
            Plan::Once { at } => Box::new(Timestamps::new(
                std::iter::once(Ok::<_, ScheduleError>(at.date())),
                DayTimes::At(at.time()),
                &spec.timezone,
                &self.resolver,
            )),
            Plan::Recurring(rec) => Box::new(Timestamps::new(
                generate::dates(&rec.dates, &rec.window),
                rec.times,
                &spec.timezone,
                &self.resolver,
            )),
        };
        series.take(cap)
    }
}
