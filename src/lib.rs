//! Occurrence computation for declarative recurrence rules.
//!
//! A [`RecurrenceSpec`] says when something should fire ("once on
//! 2025-03-01 at 10:00", "every 2 weeks on monday and wednesday", "the
//! last weekend day of every 3 months, every 30 minutes from 08:00 to
//! 12:00"). This crate validates such specs and turns them into the
//! ordered, bounded list of timestamps they describe. It never runs
//! anything and keeps no state between calls.
//!
//! # Examples
//!
//! ```
//! use cadence::{DailyMode, MonthlySpec, Pattern, RecurrenceSpec, RecurringSpec};
//! use jiff::civil::{date, time};
//!
//! let spec = RecurrenceSpec::recurring(
//!     RecurringSpec::new(
//!         date(2025, 6, 11),
//!         Pattern::Monthly(MonthlySpec::by_day(3, 2)),
//!         DailyMode::at(time(0, 0, 0, 0)),
//!     )
//!     .with_horizon(date(2025, 12, 31)),
//! );
//!
//! let next = spec.next_execution(None).unwrap();
//! assert_eq!(next.at.date(), date(2025, 8, 3));
//! ```

pub mod apply;
pub mod calendar;
pub mod config;
pub mod describe;
pub mod error;
pub mod generate;
pub mod manager;
pub mod plan;
pub mod spec;
pub mod validate;

pub use apply::{FixedResolver, OffsetResolver, TzdbResolver};
pub use config::EngineConfig;
pub use describe::{DescriptionFormatter, PlainEnglish};
pub use error::{ScheduleError, Violation, Violations};
pub use manager::{Occurrence, ScheduleManager};
pub use plan::Plan;
pub use spec::{
    ByDay, ByOrdinalWeekday, DailyMode, MonthlySpec, OnceSpec, Ordinal, Pattern, RecurrenceSpec,
    RecurringSpec, SpecKind, StepUnit, TimeRange, Weekday, WeekdayClass,
};
pub use validate::ValidationOutcome;

/// Validate `spec` with the default configuration.
pub fn validate(spec: &RecurrenceSpec, max_occurrences: Option<u32>) -> ValidationOutcome<'_> {
    ScheduleManager::new().validate(spec, max_occurrences)
}

/// The full bounded schedule of `spec`, using the default configuration and
/// the tzdb offset resolver.
pub fn compute_occurrences(
    spec: &RecurrenceSpec,
    max_occurrences: Option<u32>,
) -> Result<Vec<Occurrence<'_>>, ScheduleError> {
    ScheduleManager::new().occurrences(spec, max_occurrences)
}

/// The first occurrence of `spec` at or after its watermark.
pub fn compute_next_execution(
    spec: &RecurrenceSpec,
    max_occurrences: Option<u32>,
) -> Result<Occurrence<'_>, ScheduleError> {
    ScheduleManager::new().next_execution(spec, max_occurrences)
}

// --- RecurrenceSpec convenience methods ---

impl RecurrenceSpec {
    /// Check every rule; see [`validate`].
    pub fn validate(&self, max_occurrences: Option<u32>) -> ValidationOutcome<'_> {
        validate(self, max_occurrences)
    }

    /// The full bounded schedule; see [`compute_occurrences`].
    pub fn occurrences(
        &self,
        max_occurrences: Option<u32>,
    ) -> Result<Vec<Occurrence<'_>>, ScheduleError> {
        compute_occurrences(self, max_occurrences)
    }

    /// The next execution; see [`compute_next_execution`].
    pub fn next_execution(
        &self,
        max_occurrences: Option<u32>,
    ) -> Result<Occurrence<'_>, ScheduleError> {
        compute_next_execution(self, max_occurrences)
    }
}
