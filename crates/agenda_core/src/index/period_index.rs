//! Day → covering-periods index.
//!
//! # Responsibility
//! - Invert period day lists into a per-day lookup.
//! - Keep a stable, caller-visible period order for capped rendering.
//!
//! # Invariants
//! - Periods are returned in insertion order (snapshot order on rebuild,
//!   which the store guarantees to be creation order).
//! - `upsert` keeps an already indexed period at its original position.
//! - Removing an unknown id is a no-op, not an error.

use crate::calendar::day::CalendarDay;
use crate::model::agenda::{Agenda, AgendaId};
use crate::model::period::{Period, PeriodId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Periods shown in one grid cell plus the hidden remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCoverage<'a> {
    /// First `cap` covering periods, in index order.
    pub visible: Vec<&'a Period>,
    /// Covering periods beyond `cap` ("+N more").
    pub overflow: usize,
}

/// In-memory day → periods index.
#[derive(Debug, Clone, Default)]
pub struct PeriodIndex {
    entries: BTreeMap<u64, Period>,
    ordinals: HashMap<PeriodId, u64>,
    by_day: BTreeMap<CalendarDay, BTreeSet<u64>>,
    next_ordinal: u64,
}

impl PeriodIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from periods in their given order.
    pub fn from_periods<'a, I>(periods: I) -> Self
    where
        I: IntoIterator<Item = &'a Period>,
    {
        let mut index = Self::new();
        for period in periods {
            index.upsert(period.clone());
        }
        index
    }

    /// Builds the index for one agenda.
    ///
    /// Periods of other agendas are skipped, and nothing is indexed when
    /// `agenda_id` is not in `agendas`: orphans never reach a scoped view.
    pub fn scoped(agendas: &[Agenda], agenda_id: AgendaId, periods: &[Period]) -> Self {
        if !agendas.iter().any(|agenda| agenda.id == agenda_id) {
            return Self::new();
        }
        Self::from_periods(
            periods
                .iter()
                .filter(|period| period.agenda_id == agenda_id),
        )
    }

    /// Inserts a period or replaces the indexed copy with the same id.
    pub fn upsert(&mut self, period: Period) {
        let ordinal = match self.ordinals.get(&period.id) {
            Some(&ordinal) => {
                if let Some(previous) = self.entries.get(&ordinal) {
                    let stale = previous.days().to_vec();
                    self.unindex_days(ordinal, &stale);
                }
                ordinal
            }
            None => {
                let ordinal = self.next_ordinal;
                self.next_ordinal += 1;
                self.ordinals.insert(period.id, ordinal);
                ordinal
            }
        };

        for day in period.days() {
            self.by_day.entry(*day).or_default().insert(ordinal);
        }
        self.entries.insert(ordinal, period);
    }

    /// Removes a period. Returns `false` when it was never indexed.
    pub fn remove(&mut self, id: PeriodId) -> bool {
        let Some(ordinal) = self.ordinals.remove(&id) else {
            return false;
        };
        if let Some(period) = self.entries.remove(&ordinal) {
            let days = period.days().to_vec();
            self.unindex_days(ordinal, &days);
        }
        true
    }

    /// Periods covering `day`, in index order. Empty when none do.
    pub fn periods_covering_day(&self, day: CalendarDay) -> Vec<&Period> {
        self.by_day
            .get(&day)
            .map(|ordinals| {
                ordinals
                    .iter()
                    .filter_map(|ordinal| self.entries.get(ordinal))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Covering periods split at `cap` for "first K, +N more" rendering.
    pub fn day_coverage(&self, day: CalendarDay, cap: usize) -> DayCoverage<'_> {
        let mut visible = self.periods_covering_day(day);
        let overflow = visible.len().saturating_sub(cap);
        visible.truncate(cap);
        DayCoverage { visible, overflow }
    }

    /// Days covered by at least one period, ascending.
    pub fn covered_days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.by_day.keys().copied()
    }

    pub fn get(&self, id: PeriodId) -> Option<&Period> {
        self.ordinals
            .get(&id)
            .and_then(|ordinal| self.entries.get(ordinal))
    }

    pub fn contains(&self, id: PeriodId) -> bool {
        self.ordinals.contains_key(&id)
    }

    /// Indexed periods in index order.
    pub fn periods(&self) -> impl Iterator<Item = &Period> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unindex_days(&mut self, ordinal: u64, days: &[CalendarDay]) {
        for day in days {
            if let Some(ordinals) = self.by_day.get_mut(day) {
                ordinals.remove(&ordinal);
                if ordinals.is_empty() {
                    self.by_day.remove(day);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PeriodIndex;
    use crate::calendar::day::CalendarDay;
    use crate::model::period::{Period, PeriodDraft, PeriodPatch};
    use uuid::Uuid;

    fn day(value: &str) -> CalendarDay {
        CalendarDay::parse(value).unwrap()
    }

    fn period(name: &str, start: &str, end: &str) -> Period {
        let fields = PeriodDraft::new(name, day(start), day(end))
            .validate()
            .unwrap();
        Period::new(Uuid::new_v4(), Uuid::nil(), fields, 0, 0)
    }

    #[test]
    fn upsert_with_moved_bounds_reindexes_days_and_keeps_position() {
        let first = period("First", "2025-09-01", "2025-09-05");
        let second = period("Second", "2025-09-03", "2025-09-04");
        let mut index = PeriodIndex::from_periods([&first, &second]);

        let mut moved = first.clone();
        moved
            .apply_patch(&PeriodPatch {
                start: Some(day("2025-09-04")),
                ..PeriodPatch::default()
            })
            .unwrap();
        index.upsert(moved);

        assert!(index.periods_covering_day(day("2025-09-01")).is_empty());
        let names: Vec<_> = index
            .periods_covering_day(day("2025-09-04"))
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn remove_unknown_period_is_tolerated() {
        let mut index = PeriodIndex::new();
        assert!(!index.remove(Uuid::new_v4()));

        let only = period("Only", "2025-09-01", "2025-09-01");
        index.upsert(only.clone());
        assert!(index.remove(only.id));
        assert!(index.is_empty());
        assert_eq!(index.covered_days().count(), 0);
    }

    #[test]
    fn coverage_caps_visible_periods() {
        let periods: Vec<_> = (0..5)
            .map(|i| period(&format!("P{i}"), "2025-09-10", "2025-09-12"))
            .collect();
        let index = PeriodIndex::from_periods(&periods);
        let coverage = index.day_coverage(day("2025-09-11"), 3);
        assert_eq!(coverage.visible.len(), 3);
        assert_eq!(coverage.overflow, 2);
        assert_eq!(coverage.visible[0].name, "P0");

        let empty = index.day_coverage(day("2025-09-13"), 3);
        assert!(empty.visible.is_empty());
        assert_eq!(empty.overflow, 0);
    }
}
