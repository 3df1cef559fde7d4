//! Agenda domain model.
//!
//! # Responsibility
//! - Define the root container that owns periods.
//!
//! # Invariants
//! - `name` is non-empty after trimming.
//! - An agenda is only ever deleted together with all of its periods.

use crate::model::validation::{normalize_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned agenda identifier.
pub type AgendaId = Uuid;

/// Name used by the first-run bootstrap when no agenda exists.
pub const DEFAULT_AGENDA_NAME: &str = "My Agenda";

const DUPLICATE_SUFFIX: &str = " (Copy)";

/// Named container owning zero or more periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub id: AgendaId,
    pub name: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Agenda {
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_agenda_name(self.name.as_str()).map(|_| ())
    }
}

/// Trims and validates an agenda name.
pub fn normalize_agenda_name(name: &str) -> Result<String, ValidationError> {
    normalize_name(name, None)
}

/// Name given to the copy produced by agenda duplication.
pub fn duplicate_agenda_name(name: &str) -> String {
    format!("{}{DUPLICATE_SUFFIX}", name.trim())
}

/// Partial agenda update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaPatch {
    pub name: Option<String>,
}

impl AgendaPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Returns a copy with every present field validated and normalized.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = self
            .name
            .as_deref()
            .map(normalize_agenda_name)
            .transpose()?;
        Ok(Self { name })
    }
}

#[cfg(test)]
mod tests {
    use super::{duplicate_agenda_name, AgendaPatch};
    use crate::model::validation::ValidationError;

    #[test]
    fn patch_normalization_trims_and_rejects_blank() {
        let patch = AgendaPatch::rename("  Work  ").normalized().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Work"));
        assert_eq!(
            AgendaPatch::rename(" ").normalized(),
            Err(ValidationError::EmptyName)
        );
        assert!(AgendaPatch::default().normalized().unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_gets_copy_suffix() {
        assert_eq!(duplicate_agenda_name("Family "), "Family (Copy)");
    }
}
