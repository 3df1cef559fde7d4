//! Fixed-size month grid generation.
//!
//! # Responsibility
//! - Produce the 42-cell (six week) grid rendered for one month.
//! - Pad with trailing days of the previous month and leading days of the
//!   next month, tagging each cell with other-month and weekend flags.
//!
//! # Invariants
//! - Every grid has exactly `GRID_CELLS` cells, whatever the month length or
//!   the weekday of its first day.
//! - The in-month cells form one contiguous run of `days_in_month` cells.
//! - Month rollover at year boundaries never drifts by a day.
//! - A grid whose cells would leave the `CalendarDay` year range is refused
//!   with `InvalidYear`; navigation stops at that range.

use crate::calendar::day::CalendarDay;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cells in one rendered month: six full weeks.
pub const GRID_CELLS: usize = 42;
pub const DAYS_PER_WEEK: usize = 7;

/// Contract violations reported by grid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Month index outside `1..=12`.
    InvalidMonth(u32),
    /// Year outside the representable calendar range.
    InvalidYear(i32),
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "invalid month {month}; expected 1..=12"),
            Self::InvalidYear(year) => write!(f, "year {year} is outside the supported range"),
        }
    }
}

impl Error for GridError {}

/// First column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn first_weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Column index of `weekday` in a grid starting on `self`.
    pub fn column_of(self, weekday: Weekday) -> u32 {
        match self {
            Self::Sunday => weekday.num_days_from_sunday(),
            Self::Monday => weekday.num_days_from_monday(),
        }
    }

    /// Short column headers in grid order.
    pub fn weekday_labels(self) -> [&'static str; DAYS_PER_WEEK] {
        match self {
            Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// One rendered grid cell. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: CalendarDay,
    pub day_of_month: u32,
    pub weekday: Weekday,
    /// Padding cell borrowed from the previous or next month.
    pub is_other_month: bool,
    pub is_weekend: bool,
}

impl DayCell {
    fn new(day: CalendarDay, is_other_month: bool) -> Self {
        Self {
            day,
            day_of_month: day.day_of_month(),
            weekday: day.weekday(),
            is_other_month,
            is_weekend: day.is_weekend(),
        }
    }
}

/// Grid for one month/year pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: u32,
    year: i32,
    week_start: WeekStart,
    leading: usize,
    day_count: usize,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Six rows of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// The contiguous run of cells belonging to the viewed month.
    pub fn in_month_cells(&self) -> &[DayCell] {
        &self.cells[self.leading..self.leading + self.day_count]
    }

    /// Number of previous-month padding cells before day 1.
    pub fn leading_padding(&self) -> usize {
        self.leading
    }

    pub fn weekday_labels(&self) -> [&'static str; DAYS_PER_WEEK] {
        self.week_start.weekday_labels()
    }

    /// Cell showing `day`, if the grid contains it.
    pub fn cell_for(&self, day: CalendarDay) -> Option<&DayCell> {
        let first = self.cells.first()?;
        let offset = usize::try_from(first.day.days_until(day)).ok()?;
        self.cells.get(offset)
    }
}

/// Month/year position used by previous/next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(month: u32, year: i32) -> Result<Self, GridError> {
        first_of_month(month, year)?;
        Ok(Self { year, month })
    }

    pub fn containing(day: CalendarDay) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Following month, `None` after December of `MAX_YEAR`.
    pub fn next(self) -> Option<Self> {
        let (month, year) = following_month(self.month, self.year);
        Self::new(month, year).ok()
    }

    /// Preceding month, `None` before January of `MIN_YEAR`.
    pub fn prev(self) -> Option<Self> {
        let (month, year) = if self.month == 1 {
            (12, self.year - 1)
        } else {
            (self.month - 1, self.year)
        };
        Self::new(month, year).ok()
    }

    pub fn grid(self, week_start: WeekStart) -> Result<MonthGrid, GridError> {
        month_grid(self.month, self.year, week_start)
    }
}

/// Number of days in `month` of `year`.
pub fn days_in_month(month: u32, year: i32) -> Result<u32, GridError> {
    let first = first_of_month(month, year)?;
    let (next_month, next_year) = following_month(month, year);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or(GridError::InvalidYear(year))?;
    let days = next_first.signed_duration_since(first.as_naive()).num_days();
    u32::try_from(days).map_err(|_| GridError::InvalidYear(year))
}

/// Builds the six-week grid for `month` (1-based) of `year`.
///
/// # Errors
/// - `InvalidMonth` when `month` is outside `1..=12`.
/// - `InvalidYear` when the grid would leave the representable date range.
pub fn month_grid(month: u32, year: i32, week_start: WeekStart) -> Result<MonthGrid, GridError> {
    let first = first_of_month(month, year)?;
    let day_count = days_in_month(month, year)? as usize;
    let leading = week_start.column_of(first.weekday()) as usize;

    let mut cells = Vec::with_capacity(GRID_CELLS);

    let mut padding = Vec::with_capacity(leading);
    let mut cursor = first;
    for _ in 0..leading {
        cursor = cursor.previous().ok_or(GridError::InvalidYear(year))?;
        padding.push(cursor);
    }
    cells.extend(padding.into_iter().rev().map(|day| DayCell::new(day, true)));

    // Body and next-month padding in one forward walk; a short month still
    // fills the sixth row so the grid never changes height.
    let mut cursor = Some(first);
    while cells.len() < GRID_CELLS {
        let day = cursor.ok_or(GridError::InvalidYear(year))?;
        cells.push(DayCell::new(day, day.month() != month));
        cursor = day.next();
    }

    Ok(MonthGrid {
        month,
        year,
        week_start,
        leading,
        day_count,
        cells,
    })
}

fn first_of_month(month: u32, year: i32) -> Result<CalendarDay, GridError> {
    if !(1..=12).contains(&month) {
        return Err(GridError::InvalidMonth(month));
    }
    CalendarDay::from_ymd(year, month, 1).ok_or(GridError::InvalidYear(year))
}

fn following_month(month: u32, year: i32) -> (u32, i32) {
    if month == 12 {
        (1, year.saturating_add(1))
    } else {
        (month + 1, year)
    }
}
