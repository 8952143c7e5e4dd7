//! Caller-facing recurrence configuration.
//!
//! These types describe what the caller asked for, including combinations the
//! validator has to reject (both monthly modes at once, a time of day next to
//! a range, ...). Once a spec passes validation it is compiled into a
//! [`crate::plan::Plan`], where those combinations can no longer be expressed.

use jiff::civil::{Date, DateTime, Time};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A recurrence rule: what fires, and in which context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurrenceSpec {
    pub enabled: bool,
    /// BCP-47 style tag used by description collaborators, e.g. `en-US`.
    pub locale: String,
    /// Timezone identifier handed to the offset resolver.
    pub timezone: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: SpecKind,
}

impl RecurrenceSpec {
    /// An enabled `en-US` spec in UTC.
    pub fn new(kind: SpecKind) -> Self {
        Self {
            enabled: true,
            locale: "en-US".to_string(),
            timezone: "UTC".to_string(),
            kind,
        }
    }

    pub fn once(at: DateTime) -> Self {
        Self::new(SpecKind::Once(OnceSpec { event_at: Some(at) }))
    }

    pub fn recurring(spec: RecurringSpec) -> Self {
        Self::new(SpecKind::Recurring(spec))
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = tz.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The recurring part, if this is a recurring spec.
    pub fn as_recurring(&self) -> Option<&RecurringSpec> {
        match &self.kind {
            SpecKind::Recurring(r) => Some(r),
            SpecKind::Once(_) => None,
        }
    }
}

/// Top-level discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SpecKind {
    Once(OnceSpec),
    Recurring(RecurringSpec),
}

/// A one-shot event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct OnceSpec {
    pub event_at: Option<DateTime>,
}

/// A repeating rule bounded by a window.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecurringSpec {
    /// First date the rule may fire on.
    pub anchor: Date,
    /// Last date (inclusive) the rule may fire on.
    #[cfg_attr(feature = "serde", serde(default))]
    pub horizon: Option<Date>,
    /// The caller's "now"; next-execution ignores anything before it.
    pub watermark: DateTime,
    pub pattern: Pattern,
    pub daily: DailyMode,
}

impl RecurringSpec {
    /// A rule starting at `anchor` with the watermark at the anchor's midnight.
    pub fn new(anchor: Date, pattern: Pattern, daily: DailyMode) -> Self {
        Self {
            anchor,
            horizon: None,
            watermark: anchor.to_datetime(Time::midnight()),
            pattern,
            daily,
        }
    }

    pub fn with_horizon(mut self, horizon: Date) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn with_watermark(mut self, watermark: DateTime) -> Self {
        self.watermark = watermark;
        self
    }
}

/// Which family of dates the rule produces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "occurs", rename_all = "snake_case"))]
pub enum Pattern {
    /// Every `step_days` days from the anchor.
    Daily { step_days: u32 },
    /// The listed weekdays of every `step_weeks`-th week.
    Weekly {
        step_weeks: u32,
        weekdays: Vec<Weekday>,
    },
    Monthly(MonthlySpec),
}

/// Monthly rule. Exactly one of the two modes must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonthlySpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub by_day: Option<ByDay>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub by_ordinal: Option<ByOrdinalWeekday>,
}

impl MonthlySpec {
    pub fn by_day(day_of_month: u8, step_months: u32) -> Self {
        Self {
            by_day: Some(ByDay {
                day_of_month,
                step_months,
            }),
            by_ordinal: None,
        }
    }

    pub fn by_ordinal(ordinal: Ordinal, class: WeekdayClass, step_months: u32) -> Self {
        Self {
            by_day: None,
            by_ordinal: Some(ByOrdinalWeekday {
                ordinal: Some(ordinal),
                weekday_class: Some(class),
                step_months,
            }),
        }
    }
}

/// `day 15 of every 2 months`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ByDay {
    pub day_of_month: u8,
    pub step_months: u32,
}

/// `the last weekend day of every month`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ByOrdinalWeekday {
    pub ordinal: Option<Ordinal>,
    pub weekday_class: Option<WeekdayClass>,
    pub step_months: u32,
}

/// Times of day within each generated date: a single `at`, or a stepped `range`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyMode {
    #[cfg_attr(feature = "serde", serde(default))]
    pub at: Option<Time>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: Option<TimeRange>,
}

impl DailyMode {
    pub fn at(time: Time) -> Self {
        Self {
            at: Some(time),
            range: None,
        }
    }

    pub fn range(start: Time, end: Time, unit: StepUnit, step: u32) -> Self {
        Self {
            at: None,
            range: Some(TimeRange {
                start: Some(start),
                end: Some(end),
                unit: Some(unit),
                step,
            }),
        }
    }
}

/// `every 15 minutes from 08:00 to 17:00`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeRange {
    pub start: Option<Time>,
    pub end: Option<Time>,
    pub unit: Option<StepUnit>,
    pub step: u32,
}

/// Unit of a time-range step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepUnit {
    Hours,
    Minutes,
    Seconds,
}

impl StepUnit {
    pub fn seconds(self) -> i64 {
        match self {
            Self::Hours => 3600,
            Self::Minutes => 60,
            Self::Seconds => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Hours => "hour",
            Self::Minutes => "minute",
            Self::Seconds => "second",
        }
    }
}

/// Position of the selected day among the month's matching days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Ordinal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }
}

/// Which days of a month count as candidates for ordinal selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekdayClass {
    Day(Weekday),
    AnyDay,
    Weekday,
    WeekendDay,
}

impl WeekdayClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day(wd) => wd.as_str(),
            Self::AnyDay => "day",
            Self::Weekday => "weekday",
            Self::WeekendDay => "weekend day",
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for WeekdayClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Day(wd) => serializer.serialize_str(wd.as_str()),
            Self::AnyDay => serializer.serialize_str("any_day"),
            Self::Weekday => serializer.serialize_str("weekday"),
            Self::WeekendDay => serializer.serialize_str("weekend_day"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for WeekdayClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_weekday_class(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday class: {s}")))
    }
}

pub fn parse_weekday_class(s: &str) -> Option<WeekdayClass> {
    match s.to_lowercase().as_str() {
        "any_day" | "day" => Some(WeekdayClass::AnyDay),
        "weekday" => Some(WeekdayClass::Weekday),
        "weekend_day" | "weekend" => Some(WeekdayClass::WeekendDay),
        other => parse_weekday(other).map(WeekdayClass::Day),
    }
}

/// Weekday with custom serde (lowercase string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    pub fn to_jiff(self) -> jiff::civil::Weekday {
        match self {
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
            Self::Sunday => jiff::civil::Weekday::Sunday,
        }
    }

    pub fn from_jiff(wd: jiff::civil::Weekday) -> Self {
        match wd {
            jiff::civil::Weekday::Monday => Self::Monday,
            jiff::civil::Weekday::Tuesday => Self::Tuesday,
            jiff::civil::Weekday::Wednesday => Self::Wednesday,
            jiff::civil::Weekday::Thursday => Self::Thursday,
            jiff::civil::Weekday::Friday => Self::Friday,
            jiff::civil::Weekday::Saturday => Self::Saturday,
            jiff::civil::Weekday::Sunday => Self::Sunday,
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_weekday(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {s}")))
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Monday),
        "tuesday" | "tue" => Some(Weekday::Tuesday),
        "wednesday" | "wed" => Some(Weekday::Wednesday),
        "thursday" | "thu" => Some(Weekday::Thursday),
        "friday" | "fri" => Some(Weekday::Friday),
        "saturday" | "sat" => Some(Weekday::Saturday),
        "sunday" | "sun" => Some(Weekday::Sunday),
        _ => None,
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_deserialize_monthly_ordinal_spec() {
        let json = r#"{
            "enabled": true,
            "locale": "en-GB",
            "timezone": "Europe/London",
            "kind": "recurring",
            "anchor": "2025-01-01",
            "horizon": "2025-12-31",
            "watermark": "2025-01-01T00:00:00",
            "pattern": {
                "occurs": "monthly",
                "by_ordinal": { "ordinal": "last", "weekday_class": "sunday", "step_months": 1 }
            },
            "daily": { "at": "09:30" }
        }"#;
        let spec: RecurrenceSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.timezone, "Europe/London");
        let rec = spec.as_recurring().unwrap();
        assert_eq!(rec.anchor, date(2025, 1, 1));
        assert_eq!(rec.horizon, Some(date(2025, 12, 31)));
        assert_eq!(
            rec.pattern,
            Pattern::Monthly(MonthlySpec::by_ordinal(
                Ordinal::Last,
                WeekdayClass::Day(Weekday::Sunday),
                1
            ))
        );
        assert_eq!(rec.daily, DailyMode::at(Time::new(9, 30, 0, 0).unwrap()));
    }

    #[test]
    fn test_deserialize_once_spec() {
        let json = r#"{
            "enabled": true,
            "locale": "en-US",
            "timezone": "UTC",
            "kind": "once",
            "event_at": "2025-03-01T08:15:00"
        }"#;
        let spec: RecurrenceSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, RecurrenceSpec::once(date(2025, 3, 1).at(8, 15, 0, 0)));
    }

    #[test]
    fn test_once_rejects_recurrence_fields() {
        for extra in [
            r#""anchor": "2025-03-01""#,
            r#""pattern": { "occurs": "daily", "step_days": 1 }"#,
            r#""daily": { "at": "09:00" }"#,
        ] {
            let json = format!(
                r#"{{
                    "enabled": true,
                    "locale": "en-US",
                    "timezone": "UTC",
                    "kind": "once",
                    "event_at": "2025-03-01T08:15:00",
                    {extra}
                }}"#
            );
            let err = serde_json::from_str::<RecurrenceSpec>(&json).unwrap_err();
            assert!(err.to_string().contains("unknown field"), "{extra}: {err}");
        }
    }

    #[test]
    fn test_weekday_class_names() {
        assert_eq!(parse_weekday_class("weekend_day"), Some(WeekdayClass::WeekendDay));
        assert_eq!(parse_weekday_class("Any_Day"), Some(WeekdayClass::AnyDay));
        assert_eq!(
            parse_weekday_class("tue"),
            Some(WeekdayClass::Day(Weekday::Tuesday))
        );
        assert_eq!(parse_weekday_class("fortnight"), None);
    }

    #[test]
    fn test_weekday_serializes_lowercase() {
        let json = serde_json::to_string(&vec![Weekday::Monday, Weekday::Sunday]).unwrap();
        assert_eq!(json, r#"["monday","sunday"]"#);
    }
}
