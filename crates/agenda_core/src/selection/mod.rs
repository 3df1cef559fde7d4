//! Day-drag selection state machine.
//!
//! # Responsibility
//! - Track the in-progress drag over the month grid.
//! - Turn the gesture into a committed inclusive date range.
//!
//! # Invariants
//! - `Idle` → `Dragging` only on pointer-down over an in-month cell.
//! - The anchor is fixed at drag start; only the span end follows the pointer,
//!   including into padding cells of the adjacent months.
//! - The selected days are always the chronological span between anchor and
//!   pointer, so the committed range ignores drag direction.
//! - Pointer-up and pointer-leave both commit; the machine never stays
//!   `Dragging` after the pointer leaves the grid.

use crate::calendar::day::CalendarDay;
use crate::calendar::grid::DayCell;
use crate::calendar::range::{date_range, span_of};
use log::debug;

/// Machine state. A commit is reported as a return value and the machine
/// is back in `Idle` immediately afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging {
        anchor: CalendarDay,
        pointer: CalendarDay,
    },
}

/// Range emitted by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedRange {
    pub start: CalendarDay,
    pub end: CalendarDay,
    /// Inclusive expansion of `start..=end`.
    pub days: Vec<CalendarDay>,
}

/// Single-owner drag selection tracker.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    selected: Vec<CalendarDay>,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::Dragging { .. })
    }

    pub fn anchor(&self) -> Option<CalendarDay> {
        match self.state {
            SelectionState::Dragging { anchor, .. } => Some(anchor),
            SelectionState::Idle => None,
        }
    }

    /// Highlighted days, ascending and deduplicated.
    pub fn selected_days(&self) -> &[CalendarDay] {
        &self.selected
    }

    pub fn is_selected(&self, day: CalendarDay) -> bool {
        self.selected.binary_search(&day).is_ok()
    }

    /// Starts a drag anchored at `cell`.
    ///
    /// Returns `false` and stays put for padding cells. A pointer-down while
    /// already dragging restarts the drag from the new cell.
    pub fn pointer_down(&mut self, cell: &DayCell) -> bool {
        if cell.is_other_month {
            return false;
        }
        if self.is_dragging() {
            debug!("event=selection_restart module=selection anchor={}", cell.day);
        }
        self.state = SelectionState::Dragging {
            anchor: cell.day,
            pointer: cell.day,
        };
        self.selected = vec![cell.day];
        true
    }

    /// Extends the span to `cell`. Returns whether the selection changed.
    ///
    /// Padding cells extend the span too, so a drag can run into the
    /// neighbouring month.
    pub fn pointer_enter(&mut self, cell: &DayCell) -> bool {
        let SelectionState::Dragging { anchor, pointer } = self.state else {
            return false;
        };
        if cell.day == pointer {
            return false;
        }
        self.state = SelectionState::Dragging {
            anchor,
            pointer: cell.day,
        };
        self.selected = span_of([anchor, cell.day])
            .and_then(|(low, high)| date_range(low, high).ok())
            .unwrap_or_else(|| vec![anchor]);
        true
    }

    /// Commits the current drag. `None` when not dragging.
    pub fn pointer_up(&mut self) -> Option<CommittedRange> {
        self.commit()
    }

    /// Leaving the grid mid-drag is an implicit commit.
    pub fn pointer_leave(&mut self) -> Option<CommittedRange> {
        self.commit()
    }

    /// Plain click: identical to a one-day drag.
    pub fn click(&mut self, cell: &DayCell) -> Option<CommittedRange> {
        if !self.pointer_down(cell) {
            return None;
        }
        self.commit()
    }

    /// Abandons any drag and clears the highlight.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
        self.selected.clear();
    }

    fn commit(&mut self) -> Option<CommittedRange> {
        if !self.is_dragging() {
            return None;
        }
        let selected = std::mem::take(&mut self.selected);
        self.state = SelectionState::Idle;

        let (start, end) = match (selected.first(), selected.last()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => return None,
        };
        let days = date_range(start, end).unwrap_or(selected);
        debug!(
            "event=selection_commit module=selection start={} end={} days={}",
            start,
            end,
            days.len()
        );
        Some(CommittedRange { start, end, days })
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionMachine, SelectionState};
    use crate::calendar::day::CalendarDay;
    use crate::calendar::grid::{month_grid, MonthGrid, WeekStart};

    fn september() -> MonthGrid {
        month_grid(9, 2025, WeekStart::Sunday).unwrap()
    }

    fn cell(grid: &MonthGrid, value: &str) -> crate::calendar::grid::DayCell {
        *grid
            .cell_for(CalendarDay::parse(value).unwrap())
            .expect("day should be on the grid")
    }

    #[test]
    fn backward_drag_keeps_anchor_and_orders_span() {
        let grid = september();
        let mut machine = SelectionMachine::new();
        assert!(machine.pointer_down(&cell(&grid, "2025-09-10")));
        assert!(machine.pointer_enter(&cell(&grid, "2025-09-07")));

        assert_eq!(machine.anchor(), CalendarDay::from_ymd(2025, 9, 10));
        assert_eq!(machine.selected_days().len(), 4);
        assert_eq!(machine.selected_days()[0].to_string(), "2025-09-07");
        assert!(machine.is_selected(CalendarDay::from_ymd(2025, 9, 9).unwrap()));
    }

    #[test]
    fn padding_cell_never_starts_a_drag() {
        let grid = september();
        let mut machine = SelectionMachine::new();
        assert!(!machine.pointer_down(&cell(&grid, "2025-08-31")));
        assert_eq!(machine.state(), SelectionState::Idle);
        assert!(machine.pointer_up().is_none());
    }

    #[test]
    fn entering_padding_cell_extends_into_next_month() {
        let grid = september();
        let mut machine = SelectionMachine::new();
        machine.pointer_down(&cell(&grid, "2025-09-29"));
        machine.pointer_enter(&cell(&grid, "2025-09-30"));
        assert!(machine.pointer_enter(&cell(&grid, "2025-10-01")));
        let range = machine.pointer_leave().unwrap();
        assert_eq!(range.end.to_string(), "2025-10-01");
        assert_eq!(range.days.len(), 3);
        assert_eq!(machine.state(), SelectionState::Idle);
    }

    #[test]
    fn cancel_clears_selection() {
        let grid = september();
        let mut machine = SelectionMachine::new();
        machine.pointer_down(&cell(&grid, "2025-09-02"));
        machine.cancel();
        assert!(machine.selected_days().is_empty());
        assert!(machine.pointer_up().is_none());
    }
}
