//! Explicit per-view session state.
//!
//! # Responsibility
//! - Hold the selected agenda and selected period for one calendar view.
//! - Keep the period list and day index derived from the latest snapshots.
//!
//! # Invariants
//! - Derived state is rebuilt wholesale from each snapshot; it is never
//!   patched optimistically ahead of the store.
//! - Snapshots older than the last applied revision are ignored.
//! - The period list and index only ever hold periods of the selected
//!   agenda, and are empty when that agenda is not in the agenda list.
//! - A pending agenda selection is settled by the next applied agenda
//!   snapshot: selected when listed, dropped otherwise.

use crate::calendar::day::CalendarDay;
use crate::index::period_index::{DayCoverage, PeriodIndex};
use crate::model::agenda::{Agenda, AgendaId};
use crate::model::period::{Period, PeriodId};
use crate::store::Snapshot;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Selection requests that name something the session does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    AgendaNotFound(AgendaId),
    PeriodNotFound(PeriodId),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgendaNotFound(id) => write!(f, "agenda not in session: {id}"),
            Self::PeriodNotFound(id) => write!(f, "period not in session: {id}"),
        }
    }
}

impl Error for SessionError {}

#[derive(Debug, Default)]
pub struct AgendaSession {
    agendas: Vec<Agenda>,
    agendas_revision: Option<u64>,
    selected_agenda: Option<AgendaId>,
    pending_agenda: Option<AgendaId>,
    periods: Vec<Period>,
    periods_revision: Option<u64>,
    index: PeriodIndex,
    selected_period: Option<PeriodId>,
}

impl AgendaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agendas(&self) -> &[Agenda] {
        &self.agendas
    }

    pub fn selected_agenda_id(&self) -> Option<AgendaId> {
        self.selected_agenda
    }

    pub fn selected_agenda(&self) -> Option<&Agenda> {
        let id = self.selected_agenda?;
        self.agendas.iter().find(|agenda| agenda.id == id)
    }

    /// Switches the view to `id`, dropping the previous agenda's periods.
    pub fn select_agenda(&mut self, id: AgendaId) -> Result<(), SessionError> {
        if !self.agendas.iter().any(|agenda| agenda.id == id) {
            return Err(SessionError::AgendaNotFound(id));
        }
        self.pending_agenda = None;
        if self.selected_agenda != Some(id) {
            self.selected_agenda = Some(id);
            self.clear_periods();
            debug!("event=session_select module=session scope=agenda agenda={id}");
        }
        Ok(())
    }

    /// Selects `id` once an agenda snapshot lists it, or right away when it
    /// is already listed. Meant for an agenda the store has just created or
    /// duplicated.
    pub fn select_agenda_when_listed(&mut self, id: AgendaId) {
        if self.select_agenda(id).is_err() {
            self.pending_agenda = Some(id);
            debug!(
                "event=session_select module=session scope=agenda status=pending agenda={id}"
            );
        }
    }

    /// Agenda waiting for the next agenda snapshot to be selected.
    pub fn pending_agenda_id(&self) -> Option<AgendaId> {
        self.pending_agenda
    }

    /// Periods of the selected agenda in creation order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Whether a period snapshot has been applied since the last reset.
    pub fn has_period_snapshot(&self) -> bool {
        self.periods_revision.is_some()
    }

    pub fn index(&self) -> &PeriodIndex {
        &self.index
    }

    pub fn day_coverage(&self, day: CalendarDay, cap: usize) -> DayCoverage<'_> {
        self.index.day_coverage(day, cap)
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.index.get(id)
    }

    pub fn selected_period_id(&self) -> Option<PeriodId> {
        self.selected_period
    }

    pub fn selected_period(&self) -> Option<&Period> {
        self.selected_period.and_then(|id| self.index.get(id))
    }

    pub fn select_period(&mut self, id: PeriodId) -> Result<(), SessionError> {
        if !self.index.contains(id) {
            return Err(SessionError::PeriodNotFound(id));
        }
        self.selected_period = Some(id);
        Ok(())
    }

    pub fn clear_selected_period(&mut self) {
        self.selected_period = None;
    }

    /// Replaces the agenda list from `snapshot`. Returns whether it applied.
    ///
    /// A pending selection listed by `snapshot` wins. A selected agenda
    /// that disappeared falls back to the first agenda, or to none when the
    /// list is empty.
    pub fn apply_agendas(&mut self, snapshot: &Snapshot<Agenda>) -> bool {
        if is_stale(self.agendas_revision, snapshot.revision()) {
            return false;
        }
        self.agendas_revision = Some(snapshot.revision());
        self.agendas = snapshot.items().to_vec();

        if let Some(id) = self.pending_agenda.take() {
            if self.select_agenda(id).is_err() {
                debug!(
                    "event=session_select module=session scope=agenda status=dropped agenda={id}"
                );
            }
        }

        let still_present = self
            .selected_agenda
            .is_some_and(|id| self.agendas.iter().any(|agenda| agenda.id == id));
        if !still_present {
            let fallback = self.agendas.first().map(|agenda| agenda.id);
            if fallback != self.selected_agenda {
                debug!(
                    "event=session_select module=session scope=agenda status=fallback agenda={}",
                    fallback.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
                );
            }
            self.selected_agenda = fallback;
            self.clear_periods();
        }
        true
    }

    /// Replaces the period list for `agenda_id` from `snapshot`.
    ///
    /// Ignored when `agenda_id` is not the selected agenda or the snapshot
    /// is older than the one already applied.
    pub fn apply_periods(&mut self, agenda_id: AgendaId, snapshot: &Snapshot<Period>) -> bool {
        if self.selected_agenda != Some(agenda_id) {
            return false;
        }
        if is_stale(self.periods_revision, snapshot.revision()) {
            return false;
        }
        self.periods_revision = Some(snapshot.revision());

        self.index = PeriodIndex::scoped(&self.agendas, agenda_id, snapshot.items());
        self.periods = self.index.periods().cloned().collect();
        if self
            .selected_period
            .is_some_and(|id| !self.index.contains(id))
        {
            self.selected_period = None;
        }
        true
    }

    /// Drops every period-derived value.
    pub fn clear_periods(&mut self) {
        self.periods.clear();
        self.periods_revision = None;
        self.index = PeriodIndex::new();
        self.selected_period = None;
    }
}

fn is_stale(applied: Option<u64>, incoming: u64) -> bool {
    applied.is_some_and(|revision| incoming < revision)
}
