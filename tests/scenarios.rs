//! End-to-end scenarios through the public API.

use cadence::{
    compute_next_execution, compute_occurrences, validate, ByDay, ByOrdinalWeekday, DailyMode,
    DescriptionFormatter, MonthlySpec, Ordinal, Pattern, PlainEnglish, RecurrenceSpec,
    RecurringSpec, ScheduleError, StepUnit, Weekday, WeekdayClass,
};
use jiff::civil::{date, time, Date, DateTime};

fn recurring(anchor: Date, pattern: Pattern, daily: DailyMode) -> RecurringSpec {
    RecurringSpec::new(anchor, pattern, daily)
}

fn wall_times(spec: &RecurrenceSpec, cap: Option<u32>) -> Vec<DateTime> {
    compute_occurrences(spec, cap)
        .unwrap()
        .iter()
        .map(|o| o.at.datetime())
        .collect()
}

// =============================================================================
// Next execution
// =============================================================================

#[test]
fn monthly_by_day_lands_on_next_stepped_month() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 6, 11),
            Pattern::Monthly(MonthlySpec::by_day(3, 2)),
            DailyMode::at(time(0, 0, 0, 0)),
        )
        .with_horizon(date(2025, 12, 31)),
    );
    let next = compute_next_execution(&spec, None).unwrap();
    assert_eq!(next.at.datetime(), date(2025, 8, 3).at(0, 0, 0, 0));
}

#[test]
fn last_sunday_of_january() {
    let spec = RecurrenceSpec::recurring(recurring(
        date(2025, 1, 1),
        Pattern::Monthly(MonthlySpec::by_ordinal(
            Ordinal::Last,
            WeekdayClass::Day(Weekday::Sunday),
            1,
        )),
        DailyMode::at(time(12, 0, 0, 0)),
    ));
    let next = compute_next_execution(&spec, Some(1)).unwrap();
    assert_eq!(next.at.date(), date(2025, 1, 26));
}

#[test]
fn once_fires_at_event_time() {
    let spec = RecurrenceSpec::once(date(2026, 1, 8).at(14, 0, 0, 0));
    let next = compute_next_execution(&spec, None).unwrap();
    assert_eq!(next.at.datetime(), date(2026, 1, 8).at(14, 0, 0, 0));
    assert_eq!(compute_occurrences(&spec, None).unwrap().len(), 1);
}

#[test]
fn once_inside_spring_forward_gap() {
    let spec = RecurrenceSpec::once(date(2025, 3, 9).at(2, 30, 0, 0))
        .with_timezone("America/New_York");
    let next = compute_next_execution(&spec, None).unwrap();
    assert_eq!(next.at.timestamp().to_string(), "2025-03-09T07:30:00Z");
    assert_eq!(next.at.datetime(), date(2025, 3, 9).at(3, 30, 0, 0));
}

#[test]
fn daily_across_spring_forward_keeps_wall_time() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 3, 8),
            Pattern::Daily { step_days: 1 },
            DailyMode::at(time(9, 0, 0, 0)),
        )
        .with_horizon(date(2025, 3, 10)),
    )
    .with_timezone("America/New_York");
    let instants: Vec<String> = compute_occurrences(&spec, None)
        .unwrap()
        .iter()
        .map(|o| o.at.timestamp().to_string())
        .collect();
    assert_eq!(
        instants,
        vec![
            "2025-03-08T14:00:00Z",
            "2025-03-09T13:00:00Z",
            "2025-03-10T13:00:00Z",
        ]
    );
}

#[test]
fn empty_schedule_is_not_a_validation_error() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 1, 27),
            Pattern::Weekly {
                step_weeks: 1,
                weekdays: vec![Weekday::Sunday],
            },
            DailyMode::at(time(9, 0, 0, 0)),
        )
        .with_horizon(date(2025, 2, 1)),
    );
    assert!(validate(&spec, None).is_valid());
    let err = compute_next_execution(&spec, None).unwrap_err();
    assert!(matches!(err, ScheduleError::NoOccurrence));
}

// =============================================================================
// Month clamping
// =============================================================================

#[test]
fn day_31_in_february() {
    for (year, expected) in [(2025, 28), (2024, 29)] {
        let spec = RecurrenceSpec::recurring(recurring(
            date(year, 2, 1),
            Pattern::Monthly(MonthlySpec::by_day(31, 1)),
            DailyMode::at(time(6, 0, 0, 0)),
        ));
        let next = compute_next_execution(&spec, Some(3)).unwrap();
        assert_eq!(next.at.date(), date(year, 2, expected));
    }
}

#[test]
fn clamping_does_not_drift() {
    let spec = RecurrenceSpec::recurring(recurring(
        date(2025, 1, 31),
        Pattern::Monthly(MonthlySpec::by_day(31, 1)),
        DailyMode::at(time(6, 0, 0, 0)),
    ));
    let dates: Vec<_> = wall_times(&spec, Some(4)).iter().map(|d| d.date()).collect();
    assert_eq!(
        dates,
        vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]
    );
}

// =============================================================================
// Weekly stepping
// =============================================================================

#[test]
fn fortnightly_monday_skips_the_off_week() {
    // 2025-03-03 is a Monday
    let spec = RecurrenceSpec::recurring(recurring(
        date(2025, 3, 3),
        Pattern::Weekly {
            step_weeks: 2,
            weekdays: vec![Weekday::Monday],
        },
        DailyMode::at(time(9, 0, 0, 0)),
    ));
    let dates: Vec<_> = wall_times(&spec, Some(3)).iter().map(|d| d.date()).collect();
    assert_eq!(dates, vec![date(2025, 3, 3), date(2025, 3, 17), date(2025, 3, 31)]);
    assert!(!dates.contains(&date(2025, 3, 10)));
}

#[test]
fn weekday_order_in_spec_does_not_matter() {
    let make = |weekdays: Vec<Weekday>| {
        RecurrenceSpec::recurring(recurring(
            date(2025, 3, 3),
            Pattern::Weekly {
                step_weeks: 3,
                weekdays,
            },
            DailyMode::at(time(9, 0, 0, 0)),
        ))
    };
    let a = make(vec![Weekday::Monday, Weekday::Wednesday]);
    let b = make(vec![Weekday::Wednesday, Weekday::Monday]);
    assert_eq!(wall_times(&a, Some(6)), wall_times(&b, Some(6)));
}

// =============================================================================
// Time ranges
// =============================================================================

#[test]
fn hourly_range_on_one_date() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 5, 5),
            Pattern::Daily { step_days: 1 },
            DailyMode::range(time(8, 0, 0, 0), time(10, 0, 0, 0), StepUnit::Hours, 1),
        )
        .with_horizon(date(2025, 5, 5)),
    );
    assert_eq!(
        wall_times(&spec, None),
        vec![
            date(2025, 5, 5).at(8, 0, 0, 0),
            date(2025, 5, 5).at(9, 0, 0, 0),
            date(2025, 5, 5).at(10, 0, 0, 0),
        ]
    );
}

#[test]
fn reversed_range_is_rejected() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 5, 5),
            Pattern::Daily { step_days: 1 },
            DailyMode::range(time(10, 0, 0, 0), time(8, 0, 0, 0), StepUnit::Hours, 1),
        )
        .with_horizon(date(2025, 5, 5)),
    );
    let err = compute_occurrences(&spec, None).unwrap_err();
    assert!(err.violations().unwrap().has("daily.range.end"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn independent_problems_are_reported_in_one_call() {
    let mut rec = recurring(
        date(2025, 1, 1),
        Pattern::Monthly(MonthlySpec {
            by_day: Some(ByDay {
                day_of_month: 10,
                step_months: 1,
            }),
            by_ordinal: Some(ByOrdinalWeekday {
                ordinal: Some(Ordinal::Second),
                weekday_class: Some(WeekdayClass::Weekday),
                step_months: 1,
            }),
        }),
        DailyMode::range(time(8, 0, 0, 0), time(9, 0, 0, 0), StepUnit::Minutes, 15),
    )
    .with_horizon(date(2025, 6, 30));
    rec.daily.at = Some(time(7, 0, 0, 0));
    let spec = RecurrenceSpec::recurring(rec);

    let outcome = validate(&spec, None);
    let violations = outcome.violations().unwrap();
    assert!(violations.has("pattern.monthly"));
    assert!(violations.has("daily.at"));
    assert_eq!(violations.len(), 2);
}

#[test]
fn validation_does_not_touch_the_spec() {
    let spec = RecurrenceSpec::recurring(recurring(
        date(2025, 1, 1),
        Pattern::Daily { step_days: 0 },
        DailyMode::default(),
    ));
    let before = spec.clone();
    let _ = validate(&spec, None);
    let _ = compute_next_execution(&spec, Some(3));
    assert_eq!(spec, before);
}

// =============================================================================
// Descriptions
// =============================================================================

#[test]
fn plain_english_description() {
    let spec = RecurrenceSpec::recurring(
        recurring(
            date(2025, 6, 11),
            Pattern::Monthly(MonthlySpec::by_day(3, 2)),
            DailyMode::at(time(0, 0, 0, 0)),
        )
        .with_horizon(date(2025, 12, 31)),
    );
    let next = spec.next_execution(None).unwrap();
    assert_eq!(
        PlainEnglish.describe(&spec, &next),
        "every 2 months on the 3rd at 00:00 starting 2025-06-11 until 2025-12-31; next on 2025-08-03 at 00:00"
    );
}

// =============================================================================
// Serde input
// =============================================================================

#[cfg(feature = "serde")]
#[test]
fn spec_from_json() {
    let json = r#"{
        "enabled": true,
        "locale": "en-US",
        "timezone": "UTC",
        "kind": "recurring",
        "anchor": "2025-03-03",
        "horizon": "2025-03-31",
        "watermark": "2025-03-12T00:00:00",
        "pattern": { "occurs": "weekly", "step_weeks": 1, "weekdays": ["mon", "thursday"] },
        "daily": { "range": { "start": "09:00", "end": "09:30", "unit": "minutes", "step": 15 } }
    }"#;
    let spec: RecurrenceSpec = serde_json::from_str(json).unwrap();
    let next = compute_next_execution(&spec, None).unwrap();
    assert_eq!(next.at.datetime(), date(2025, 3, 13).at(9, 0, 0, 0));
    // Five Mondays and four Thursdays, three times each.
    assert_eq!(compute_occurrences(&spec, None).unwrap().len(), 27);
}
