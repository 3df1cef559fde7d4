//! Calendar-day identifier.
//!
//! # Responsibility
//! - Represent one timezone-naive civil date.
//! - Own the canonical `YYYY-MM-DD` text form used at every boundary.
//!
//! # Invariants
//! - Parsing accepts only the zero-padded `YYYY-MM-DD` form.
//! - Years stay within `MIN_YEAR..=MAX_YEAR`, the four-digit span of that form.
//! - Ordering is chronological; `Display` output parses back to the same day.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid calendar day regex"));

const DAY_FORMAT: &str = "%Y-%m-%d";

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// Errors produced while parsing a calendar-day identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayParseError {
    /// Input is not shaped like `YYYY-MM-DD`.
    Malformed(String),
    /// Input is shaped correctly but names no real date (e.g. `2025-02-30`).
    OutOfRange(String),
}

impl Display for DayParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => {
                write!(f, "calendar day `{value}` is not in YYYY-MM-DD form")
            }
            Self::OutOfRange(value) => write!(f, "calendar day `{value}` does not exist"),
        }
    }
}

impl Error for DayParseError {}

/// Timezone-naive civil date, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Builds a day from year/month/day parts, `None` when the date does not
    /// exist or falls outside `MIN_YEAR..=MAX_YEAR`.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_naive)
    }

    /// Wraps `date`, `None` outside `MIN_YEAR..=MAX_YEAR`.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(Self(date))
    }

    /// Parses the canonical `YYYY-MM-DD` form.
    pub fn parse(value: &str) -> Result<Self, DayParseError> {
        if !DAY_RE.is_match(value) {
            return Err(DayParseError::Malformed(value.to_string()));
        }
        NaiveDate::parse_from_str(value, DAY_FORMAT)
            .map(Self)
            .map_err(|_| DayParseError::OutOfRange(value.to_string()))
    }

    /// Today in the local timezone, reduced to its civil date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturday and Sunday are weekend days regardless of the grid's week start.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Following day, `None` after `9999-12-31`.
    pub fn next(&self) -> Option<Self> {
        self.0.succ_opt().and_then(Self::from_naive)
    }

    /// Preceding day, `None` before `0000-01-01`.
    pub fn previous(&self) -> Option<Self> {
        self.0.pred_opt().and_then(Self::from_naive)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: CalendarDay) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = DayParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = DayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<CalendarDay> for String {
    fn from(value: CalendarDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarDay, DayParseError};
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn parse_accepts_canonical_form_and_displays_it_back() {
        let day = CalendarDay::parse("2025-09-01").expect("canonical day should parse");
        assert_eq!(day.to_string(), "2025-09-01");
        assert_eq!(day.weekday(), Weekday::Mon);
        assert!(!day.is_weekend());
    }

    #[test]
    fn parse_rejects_unpadded_and_impossible_days() {
        assert!(matches!(
            CalendarDay::parse("2025-9-1"),
            Err(DayParseError::Malformed(_))
        ));
        assert!(matches!(
            CalendarDay::parse("2025-09-01T00:00:00"),
            Err(DayParseError::Malformed(_))
        ));
        assert!(matches!(
            CalendarDay::parse("2025-02-30"),
            Err(DayParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn parse_rejects_non_ascii_digits_as_malformed() {
        assert!(matches!(
            CalendarDay::parse("\u{662}\u{660}\u{662}\u{665}-\u{660}\u{669}-\u{660}\u{661}"),
            Err(DayParseError::Malformed(_))
        ));
    }

    #[test]
    fn years_past_four_digits_are_not_days() {
        assert_eq!(CalendarDay::from_ymd(10000, 1, 1), None);
        assert_eq!(CalendarDay::from_ymd(-1, 12, 31), None);
        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert_eq!(CalendarDay::from_naive(far), None);

        let last = CalendarDay::from_ymd(9999, 12, 31).unwrap();
        assert_eq!(last.next(), None);
        assert_eq!(CalendarDay::parse(&last.to_string()), Ok(last));
        let first = CalendarDay::from_ymd(0, 1, 1).unwrap();
        assert_eq!(first.previous(), None);
        assert_eq!(first.to_string(), "0000-01-01");
        assert_eq!(CalendarDay::parse("0000-01-01"), Ok(first));
    }

    #[test]
    fn next_and_previous_cross_year_boundary() {
        let new_year = CalendarDay::from_ymd(2026, 1, 1).unwrap();
        let eve = new_year.previous().unwrap();
        assert_eq!(eve.to_string(), "2025-12-31");
        assert_eq!(eve.next(), Some(new_year));
        assert_eq!(eve.days_until(new_year), 1);
        assert_eq!(new_year.days_until(eve), -1);
    }

    #[test]
    fn serde_uses_string_form() {
        let day = CalendarDay::from_ymd(2025, 10, 2).unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2025-10-02\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
        assert!(serde_json::from_str::<CalendarDay>("\"02/10/2025\"").is_err());
    }
}
