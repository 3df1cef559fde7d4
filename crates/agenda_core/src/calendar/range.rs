//! Inclusive date-range expansion.
//!
//! # Responsibility
//! - Expand a `(start, end)` pair into every calendar day between them.
//!
//! # Invariants
//! - Output is strictly increasing, starts with `start`, ends with `end`, and
//!   has `days(end - start) + 1` entries.
//! - `end < start` is a caller error, reported and never silently swapped.

use crate::calendar::day::{CalendarDay, DayParseError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors reported by range expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    InvalidDay(DayParseError),
    EndBeforeStart {
        start: CalendarDay,
        end: CalendarDay,
    },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDay(err) => write!(f, "{err}"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "range end {end} is before range start {start}")
            }
        }
    }
}

impl Error for RangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDay(err) => Some(err),
            Self::EndBeforeStart { .. } => None,
        }
    }
}

impl From<DayParseError> for RangeError {
    fn from(value: DayParseError) -> Self {
        Self::InvalidDay(value)
    }
}

/// Expands `start..=end` into an ordered list of days.
pub fn date_range(start: CalendarDay, end: CalendarDay) -> Result<Vec<CalendarDay>, RangeError> {
    if end < start {
        return Err(RangeError::EndBeforeStart { start, end });
    }
    let len = start.days_until(end) as usize + 1;
    Ok(start
        .as_naive()
        .iter_days()
        .take(len)
        .filter_map(CalendarDay::from_naive)
        .collect())
}

/// Same as [`date_range`] over `YYYY-MM-DD` text inputs.
pub fn date_range_str(start: &str, end: &str) -> Result<Vec<CalendarDay>, RangeError> {
    date_range(CalendarDay::parse(start)?, CalendarDay::parse(end)?)
}

/// Earliest and latest day of `days`, `None` when empty.
pub fn span_of<I>(days: I) -> Option<(CalendarDay, CalendarDay)>
where
    I: IntoIterator<Item = CalendarDay>,
{
    days.into_iter().fold(None, |span, day| match span {
        None => Some((day, day)),
        Some((low, high)) => Some((low.min(day), high.max(day))),
    })
}

/// Short label for list rows: `28 Sep` or `28 Sep - 2 Oct`.
pub fn format_day_range(start: CalendarDay, end: CalendarDay) -> String {
    let label = |day: CalendarDay| day.as_naive().format("%-d %b").to_string();
    if start == end {
        label(start)
    } else {
        format!("{} - {}", label(start), label(end))
    }
}

#[cfg(test)]
mod tests {
    use super::{date_range, date_range_str, format_day_range, span_of, RangeError};
    use crate::calendar::day::CalendarDay;

    fn day(value: &str) -> CalendarDay {
        CalendarDay::parse(value).unwrap()
    }

    #[test]
    fn reversed_bounds_are_reported() {
        let err = date_range(day("2025-10-02"), day("2025-09-28")).unwrap_err();
        assert!(matches!(err, RangeError::EndBeforeStart { .. }));
    }

    #[test]
    fn text_inputs_must_be_canonical() {
        assert!(matches!(
            date_range_str("2025/09/28", "2025-10-02"),
            Err(RangeError::InvalidDay(_))
        ));
    }

    #[test]
    fn span_of_ignores_input_order() {
        let span = span_of([day("2025-09-30"), day("2025-09-12"), day("2025-09-20")]);
        assert_eq!(span, Some((day("2025-09-12"), day("2025-09-30"))));
        assert_eq!(span_of(Vec::new()), None);
    }

    #[test]
    fn format_day_range_collapses_single_day() {
        assert_eq!(format_day_range(day("2025-09-28"), day("2025-09-28")), "28 Sep");
        assert_eq!(
            format_day_range(day("2025-09-28"), day("2025-10-02")),
            "28 Sep - 2 Oct"
        );
    }
}
