//! Agenda and period use-case service.
//!
//! # Responsibility
//! - Validate user input before any store call.
//! - Provide stable entry points for agenda and period management.
//! - Turn failures into logged, user-presentable notices.
//!
//! # Invariants
//! - Invalid input never reaches the store.
//! - No caller-visible state changes before the store confirms a write;
//!   sessions only move when the resulting snapshot arrives.
//! - Deleting an already-deleted period succeeds.

use crate::model::agenda::{
    normalize_agenda_name, Agenda, AgendaId, AgendaPatch, DEFAULT_AGENDA_NAME,
};
use crate::model::period::{Period, PeriodDraft, PeriodId, PeriodPatch};
use crate::model::validation::ValidationError;
use crate::selection::CommittedRange;
use crate::service::feed::SessionFeed;
use crate::service::session::AgendaSession;
use crate::store::{AgendaStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    AgendaNotFound(AgendaId),
    PeriodNotFound(PeriodId),
    /// Persistence failure; the write did not happen.
    Store(StoreError),
}

impl ServiceError {
    /// Short advisory message for the person using the calendar.
    pub fn user_notice(&self) -> String {
        match self {
            Self::Validation(err) => format!("Please check your input: {err}."),
            Self::AgendaNotFound(_) => "This agenda no longer exists.".to_string(),
            Self::PeriodNotFound(_) => "This period no longer exists.".to_string(),
            Self::Store(_) => "Your change could not be saved. Please try again.".to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AgendaNotFound(id) => write!(f, "agenda not found: {id}"),
            Self::PeriodNotFound(id) => write!(f, "period not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::AgendaNotFound(id) => Self::AgendaNotFound(id),
            StoreError::PeriodNotFound(id) => Self::PeriodNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Use-case service over any `AgendaStore`.
pub struct AgendaService<S: AgendaStore> {
    store: S,
    default_agenda_name: String,
}

impl<S: AgendaStore> AgendaService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_agenda_name: DEFAULT_AGENDA_NAME.to_string(),
        }
    }

    /// Overrides the name used by [`Self::ensure_default_agenda`].
    pub fn with_default_agenda_name(mut self, name: impl Into<String>) -> Self {
        self.default_agenda_name = name.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// First-run bootstrap: returns the first agenda, creating the default
    /// one when none exists. Meant to be called once by the embedding.
    pub fn ensure_default_agenda(&self) -> ServiceResult<AgendaId> {
        report("agenda_bootstrap", || {
            if let Some(agenda) = self.store.list_agendas()?.first() {
                return Ok(agenda.id);
            }
            let name = normalize_agenda_name(self.default_agenda_name.as_str())?;
            let id = self.store.create_agenda(name.as_str())?;
            info!("event=agenda_bootstrap module=service status=created agenda={id}");
            Ok(id)
        })
    }

    pub fn list_agendas(&self) -> ServiceResult<Vec<Agenda>> {
        report("agenda_list", || Ok(self.store.list_agendas()?))
    }

    pub fn create_agenda(&self, name: &str) -> ServiceResult<AgendaId> {
        report("agenda_create", || {
            let name = normalize_agenda_name(name)?;
            Ok(self.store.create_agenda(name.as_str())?)
        })
    }

    pub fn rename_agenda(&self, id: AgendaId, name: &str) -> ServiceResult<Agenda> {
        report("agenda_rename", || {
            let patch = AgendaPatch::rename(name).normalized()?;
            Ok(self.store.update_agenda(id, &patch)?)
        })
    }

    /// Deletes the agenda together with all of its periods.
    pub fn delete_agenda(&self, id: AgendaId) -> ServiceResult<()> {
        report("agenda_delete", || Ok(self.store.delete_agenda(id)?))
    }

    pub fn duplicate_agenda(&self, id: AgendaId) -> ServiceResult<AgendaId> {
        report("agenda_duplicate", || Ok(self.store.duplicate_agenda(id)?))
    }

    pub fn list_periods(&self, agenda_id: AgendaId) -> ServiceResult<Vec<Period>> {
        report("period_list", || Ok(self.store.list_periods(agenda_id)?))
    }

    pub fn get_period(&self, id: PeriodId) -> ServiceResult<Period> {
        report("period_get", || {
            self.store
                .get_period(id)?
                .ok_or(ServiceError::PeriodNotFound(id))
        })
    }

    pub fn create_period(
        &self,
        agenda_id: AgendaId,
        draft: &PeriodDraft,
    ) -> ServiceResult<PeriodId> {
        report("period_create", || {
            draft.validate()?;
            Ok(self.store.create_period(agenda_id, draft)?)
        })
    }

    /// Creates a period spanning a committed drag selection.
    pub fn create_period_from_selection(
        &self,
        agenda_id: AgendaId,
        range: &CommittedRange,
        name: &str,
        description: &str,
        color: &str,
    ) -> ServiceResult<PeriodId> {
        let draft = PeriodDraft::new(name, range.start, range.end)
            .with_description(description)
            .with_color(color);
        self.create_period(agenda_id, &draft)
    }

    /// Applies `patch` to an existing period.
    ///
    /// Fails with `PeriodNotFound` when the period was deleted meanwhile; the
    /// period is never recreated.
    pub fn update_period(&self, id: PeriodId, patch: &PeriodPatch) -> ServiceResult<Period> {
        report("period_update", || {
            patch.validate_fields()?;
            Ok(self.store.update_period(id, patch)?)
        })
    }

    /// Deletes a period; an unknown id is logged and treated as done.
    pub fn delete_period(&self, id: PeriodId) -> ServiceResult<()> {
        match self.store.delete_period(id) {
            Ok(()) => Ok(()),
            Err(StoreError::PeriodNotFound(_)) => {
                warn!("event=period_delete module=service status=missing period={id}");
                Ok(())
            }
            Err(err) => report("period_delete", || Err(err.into())),
        }
    }

    /// Subscribes `session` to this service's store.
    pub fn open_feed(&self, session: &mut AgendaSession) -> ServiceResult<SessionFeed> {
        report("feed_open", || Ok(SessionFeed::open(&self.store, session)?))
    }

    /// Applies pending snapshots to `session`. Returns whether it changed.
    pub fn pump(
        &self,
        feed: &mut SessionFeed,
        session: &mut AgendaSession,
    ) -> ServiceResult<bool> {
        report("feed_pump", || Ok(feed.pump(&self.store, session)?))
    }
}

fn report<T>(
    operation: &'static str,
    action: impl FnOnce() -> ServiceResult<T>,
) -> ServiceResult<T> {
    let result = action();
    if let Err(err) = &result {
        match err {
            ServiceError::Validation(_) => {
                warn!("event={operation} module=service status=rejected error={err}")
            }
            _ => error!("event={operation} module=service status=error error={err}"),
        }
    }
    result
}
