use agenda_core::{date_range, date_range_str, format_day_range, CalendarDay, RangeError};

fn day(value: &str) -> CalendarDay {
    CalendarDay::parse(value).unwrap()
}

#[test]
fn singleton_range_is_one_day() {
    let start = day("2025-09-17");
    assert_eq!(date_range(start, start).unwrap(), vec![start]);
}

#[test]
fn range_crossing_month_end_matches_wall_calendar() {
    let days = date_range_str("2025-09-28", "2025-10-02").unwrap();
    let labels: Vec<String> = days.iter().map(ToString::to_string).collect();
    assert_eq!(
        labels,
        vec![
            "2025-09-28",
            "2025-09-29",
            "2025-09-30",
            "2025-10-01",
            "2025-10-02",
        ]
    );
    assert_eq!(
        format_day_range(days[0], days[days.len() - 1]),
        "28 Sep - 2 Oct"
    );
}

#[test]
fn ranges_are_bounded_gapless_and_sized_by_day_distance() {
    let pairs = [
        ("2024-02-27", "2024-03-02"),
        ("2025-12-30", "2026-01-03"),
        ("2025-01-01", "2025-12-31"),
        ("2025-03-29", "2025-03-31"),
    ];
    for (start, end) in pairs {
        let (start, end) = (day(start), day(end));
        let days = date_range(start, end).unwrap();

        assert_eq!(days.len() as i64, start.days_until(end) + 1);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        for pair in days.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
    }
}

#[test]
fn leap_day_is_included() {
    let days = date_range(day("2024-02-28"), day("2024-03-01")).unwrap();
    assert_eq!(days[1].to_string(), "2024-02-29");
    assert_eq!(days.len(), 3);
}

#[test]
fn reversed_range_is_an_error_not_a_swap() {
    let err = date_range(day("2025-10-02"), day("2025-09-28")).unwrap_err();
    match err {
        RangeError::EndBeforeStart { start, end } => {
            assert_eq!(start.to_string(), "2025-10-02");
            assert_eq!(end.to_string(), "2025-09-28");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn impossible_dates_are_rejected() {
    assert!(matches!(
        date_range_str("2025-02-30", "2025-03-01"),
        Err(RangeError::InvalidDay(_))
    ));
}
