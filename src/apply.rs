//! Time appliers: turn generated dates into fixed-offset timestamps.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::{AmbiguousOffset, Offset, TimeZone};
use jiff::{Timestamp, Zoned};

use crate::error::ScheduleError;
use crate::plan::{DayTimes, TimeStep};

/// Resolves UTC offsets for a named zone.
pub trait OffsetResolver {
    /// The offset that places the wall-clock time `at` on the timeline.
    ///
    /// Inside a gap this is not the offset the zone shows at the resulting
    /// instant; use [`OffsetResolver::offset_at_instant`] for that.
    fn offset_at(&self, timezone: &str, at: DateTime) -> Result<Offset, ScheduleError>;

    /// The offset in effect at `instant`.
    fn offset_at_instant(&self, timezone: &str, instant: Timestamp) -> Result<Offset, ScheduleError>;
}

impl<R: OffsetResolver + ?Sized> OffsetResolver for &R {
    fn offset_at(&self, timezone: &str, at: DateTime) -> Result<Offset, ScheduleError> {
        (**self).offset_at(timezone, at)
    }

    fn offset_at_instant(&self, timezone: &str, instant: Timestamp) -> Result<Offset, ScheduleError> {
        (**self).offset_at_instant(timezone, instant)
    }
}

/// Looks zones up in the time zone database jiff was built with.
///
/// `UTC` (any case) never touches the database. Wall-clock times that fall
/// in a gap or fold are placed with jiff's "compatible" strategy: a gap time
/// moves forward by the length of the gap, a fold time takes the earlier
/// instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzdbResolver;

impl TzdbResolver {
    fn zone(name: &str) -> Result<TimeZone, ScheduleError> {
        if name.eq_ignore_ascii_case("utc") {
            return Ok(TimeZone::UTC);
        }
        TimeZone::get(name).map_err(|e| ScheduleError::offset(name, e))
    }
}

impl OffsetResolver for TzdbResolver {
    fn offset_at(&self, timezone: &str, at: DateTime) -> Result<Offset, ScheduleError> {
        let tz = Self::zone(timezone.trim())?;
        let offset = match tz.to_ambiguous_timestamp(at).offset() {
            AmbiguousOffset::Unambiguous { offset } => offset,
            AmbiguousOffset::Gap { before, .. } | AmbiguousOffset::Fold { before, .. } => before,
        };
        Ok(offset)
    }

    fn offset_at_instant(&self, timezone: &str, instant: Timestamp) -> Result<Offset, ScheduleError> {
        Ok(Self::zone(timezone.trim())?.to_offset(instant))
    }
}

/// Ignores the zone name and always answers with the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedResolver(pub Offset);

impl OffsetResolver for FixedResolver {
    fn offset_at(&self, _timezone: &str, _at: DateTime) -> Result<Offset, ScheduleError> {
        Ok(self.0)
    }

    fn offset_at_instant(&self, _timezone: &str, _instant: Timestamp) -> Result<Offset, ScheduleError> {
        Ok(self.0)
    }
}

/// Times of day from `start` to `end` inclusive, `step` seconds apart.
///
/// Never passes `end` and never wraps into the next day.
#[derive(Debug, Clone)]
pub struct TimeSteps {
    next: Option<i64>,
    end: i64,
    step: i64,
}

impl TimeSteps {
    pub fn new(step: &TimeStep) -> Self {
        let seconds = step.seconds();
        assert!(seconds > 0, "time step must be positive");
        Self {
            next: Some(second_of_day(step.start)),
            end: second_of_day(step.end),
            step: seconds,
        }
    }

    /// Just `time`.
    pub fn single(time: Time) -> Self {
        let s = second_of_day(time);
        Self {
            next: Some(s),
            end: s,
            step: 1,
        }
    }

    pub fn for_day(times: &DayTimes) -> Self {
        match times {
            DayTimes::At(t) => Self::single(*t),
            DayTimes::Every(step) => Self::new(step),
        }
    }
}

impl Iterator for TimeSteps {
    type Item = Time;

    fn next(&mut self) -> Option<Time> {
        let current = self.next.filter(|s| *s <= self.end)?;
        self.next = current.checked_add(self.step);
        time_of_second(current)
    }
}

fn second_of_day(t: Time) -> i64 {
    i64::from(t.hour()) * 3600 + i64::from(t.minute()) * 60 + i64::from(t.second())
}

fn time_of_second(s: i64) -> Option<Time> {
    Time::new((s / 3600) as i8, (s % 3600 / 60) as i8, (s % 60) as i8, 0).ok()
}

/// Expands dates into timestamps using `times`, resolving each wall-clock
/// time through an [`OffsetResolver`].
///
/// Output is strictly increasing: an instant not after the previous one
/// (possible when a gap pushes a time forward) is dropped.
pub struct Timestamps<'r, D, R> {
    dates: D,
    times: DayTimes,
    timezone: &'r str,
    resolver: R,
    current: Option<(Date, TimeSteps)>,
    last: Option<Timestamp>,
    done: bool,
}

impl<'r, D, R> Timestamps<'r, D, R>
where
    D: Iterator<Item = Result<Date, ScheduleError>>,
    R: OffsetResolver,
{
    pub fn new(dates: D, times: DayTimes, timezone: &'r str, resolver: R) -> Self {
        Self {
            dates,
            times,
            timezone,
            resolver,
            current: None,
            last: None,
            done: false,
        }
    }

    /// Place `at` on the timeline, then pin it to the offset shown at that
    /// instant. The wall clock of the result differs from `at` only when
    /// `at` falls in a gap.
    fn resolve(&self, at: DateTime) -> Result<Zoned, ScheduleError> {
        let placed = self.resolver.offset_at(self.timezone, at)?;
        let instant = placed.to_timestamp(at)?;
        let offset = self.resolver.offset_at_instant(self.timezone, instant)?;
        Ok(instant.to_zoned(TimeZone::fixed(offset)))
    }

    fn fail(&mut self, err: ScheduleError) -> Option<Result<Zoned, ScheduleError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<D, R> Iterator for Timestamps<'_, D, R>
where
    D: Iterator<Item = Result<Date, ScheduleError>>,
    R: OffsetResolver,
{
    type Item = Result<Zoned, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let wall = self
                .current
                .as_mut()
                .and_then(|(date, steps)| steps.next().map(|t| date.to_datetime(t)));
            let Some(wall) = wall else {
                match self.dates.next()? {
                    Ok(date) => self.current = Some((date, TimeSteps::for_day(&self.times))),
                    Err(e) => return self.fail(e),
                }
                continue;
            };
            let zoned = match self.resolve(wall) {
                Ok(z) => z,
                Err(e) => return self.fail(e),
            };
            if self.last.is_some_and(|last| zoned.timestamp() <= last) {
                tracing::trace!(%wall, "dropping non-increasing instant");
                continue;
            }
            self.last = Some(zoned.timestamp());
            tracing::trace!(%zoned, "occurrence");
            return Some(Ok(zoned));
        }
    }
}
