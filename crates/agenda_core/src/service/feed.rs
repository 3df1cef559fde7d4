//! Subscription pump driving an `AgendaSession`.
//!
//! # Responsibility
//! - Own the live subscriptions backing one session.
//! - Re-target the period subscription whenever the selected agenda changes.
//!
//! # Invariants
//! - At most one period subscription is alive, and it always follows the
//!   session's selected agenda after a `pump`.

use crate::model::agenda::{Agenda, AgendaId};
use crate::model::period::Period;
use crate::service::session::AgendaSession;
use crate::store::{AgendaStore, StoreResult, Subscription};
use log::debug;

pub struct SessionFeed {
    agendas: Subscription<Agenda>,
    periods: Option<(AgendaId, Subscription<Period>)>,
}

impl SessionFeed {
    /// Subscribes to agendas and applies the initial snapshots to `session`.
    pub fn open<S>(store: &S, session: &mut AgendaSession) -> StoreResult<Self>
    where
        S: AgendaStore + ?Sized,
    {
        let mut feed = Self {
            agendas: store.subscribe_agendas()?,
            periods: None,
        };
        feed.pump(store, session)?;
        Ok(feed)
    }

    /// Agenda whose periods are currently subscribed.
    pub fn watched_agenda(&self) -> Option<AgendaId> {
        self.periods.as_ref().map(|(agenda_id, _)| *agenda_id)
    }

    /// Applies every pending snapshot. Returns whether the session changed.
    pub fn pump<S>(&mut self, store: &S, session: &mut AgendaSession) -> StoreResult<bool>
    where
        S: AgendaStore + ?Sized,
    {
        let mut changed = false;
        if let Some(snapshot) = self.agendas.latest() {
            changed |= session.apply_agendas(&snapshot);
        }

        let selected = session.selected_agenda_id();
        let reset = selected.is_some() && !session.has_period_snapshot();
        if selected != self.watched_agenda() || reset {
            self.periods = match selected {
                Some(agenda_id) => Some((agenda_id, store.subscribe_periods(agenda_id)?)),
                None => None,
            };
            debug!(
                "event=feed_retarget module=service agenda={}",
                selected
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            changed = true;
        }

        if let Some((agenda_id, subscription)) = &mut self.periods {
            if let Some(snapshot) = subscription.latest() {
                changed |= session.apply_periods(*agenda_id, &snapshot);
            }
        }
        Ok(changed)
    }
}
