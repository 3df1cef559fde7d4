//! Agenda/period store contract and its SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow collaborator contract the core depends on.
//! - Isolate SQL details from service and session orchestration.
//!
//! # Invariants
//! - Write paths validate before persisting; nothing is partially applied.
//! - Deleting an agenda deletes its periods in the same transaction.
//! - Subscribers see full snapshots only after a mutation commits.
//! - Period listings are in creation order.

pub mod sqlite_store;
pub mod subscription;

use crate::db::DbError;
use crate::model::agenda::{Agenda, AgendaId, AgendaPatch};
use crate::model::period::{Period, PeriodDraft, PeriodId, PeriodPatch};
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use sqlite_store::SqliteAgendaStore;
pub use subscription::{Snapshot, Subscription};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failures.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    Db(DbError),
    AgendaNotFound(AgendaId),
    PeriodNotFound(PeriodId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row violates a model invariant.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AgendaNotFound(id) => write!(f, "agenda not found: {id}"),
            Self::PeriodNotFound(id) => write!(f, "period not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "agenda store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator consumed by the core.
pub trait AgendaStore {
    /// Live feed of the full agenda collection.
    fn subscribe_agendas(&self) -> StoreResult<Subscription<Agenda>>;
    /// Live feed of the periods owned by `agenda_id`.
    fn subscribe_periods(&self, agenda_id: AgendaId) -> StoreResult<Subscription<Period>>;

    fn list_agendas(&self) -> StoreResult<Vec<Agenda>>;
    fn get_agenda(&self, id: AgendaId) -> StoreResult<Option<Agenda>>;
    fn create_agenda(&self, name: &str) -> StoreResult<AgendaId>;
    fn update_agenda(&self, id: AgendaId, patch: &AgendaPatch) -> StoreResult<Agenda>;
    /// Deletes the agenda and every period referencing it, atomically.
    fn delete_agenda(&self, id: AgendaId) -> StoreResult<()>;
    /// Deep-copies the agenda and its periods; returns the new agenda id.
    fn duplicate_agenda(&self, id: AgendaId) -> StoreResult<AgendaId>;

    fn list_periods(&self, agenda_id: AgendaId) -> StoreResult<Vec<Period>>;
    fn get_period(&self, id: PeriodId) -> StoreResult<Option<Period>>;
    fn create_period(&self, agenda_id: AgendaId, draft: &PeriodDraft) -> StoreResult<PeriodId>;
    /// Applies `patch`, recomputing the day list when a bound moves.
    fn update_period(&self, id: PeriodId, patch: &PeriodPatch) -> StoreResult<Period>;
    fn delete_period(&self, id: PeriodId) -> StoreResult<()>;
}
