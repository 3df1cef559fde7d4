//! Period domain model.
//!
//! # Responsibility
//! - Define the named, colored date range owned by one agenda.
//! - Keep the materialized day list in lockstep with the date bounds.
//!
//! # Invariants
//! - `end >= start`.
//! - `days` is always exactly `date_range(start, end)`; it is only rebuilt
//!   through `set_bounds`/`apply_patch`, never assigned directly.
//! - `name` is 1..=50 characters after trimming, `description` at most 200.

use crate::calendar::day::CalendarDay;
use crate::calendar::range::date_range;
use crate::model::agenda::AgendaId;
use crate::model::color::Color;
use crate::model::validation::{
    ensure_ordered, normalize_description, normalize_name, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned period identifier.
pub type PeriodId = Uuid;

pub const PERIOD_NAME_MAX_CHARS: usize = 50;
pub const PERIOD_DESCRIPTION_MAX_CHARS: usize = 200;

/// Validated, normalized user-editable period fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFields {
    pub name: String,
    pub description: String,
    pub color: Color,
    pub start: CalendarDay,
    pub end: CalendarDay,
}

impl PeriodFields {
    pub fn new(
        name: &str,
        description: &str,
        color: Color,
        start: CalendarDay,
        end: CalendarDay,
    ) -> Result<Self, ValidationError> {
        let name = normalize_name(name, Some(PERIOD_NAME_MAX_CHARS))?;
        let description = normalize_description(description, PERIOD_DESCRIPTION_MAX_CHARS)?;
        ensure_ordered(start, end)?;
        Ok(Self {
            name,
            description,
            color,
            start,
            end,
        })
    }
}

/// Named, colored date range owned by one agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PeriodRecord")]
pub struct Period {
    pub id: PeriodId,
    pub agenda_id: AgendaId,
    pub name: String,
    pub description: String,
    pub color: Color,
    start: CalendarDay,
    end: CalendarDay,
    days: Vec<CalendarDay>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Period {
    /// Assembles a period from validated fields and materializes its days.
    pub fn new(
        id: PeriodId,
        agenda_id: AgendaId,
        fields: PeriodFields,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        let days = materialize(fields.start, fields.end);
        Self {
            id,
            agenda_id,
            name: fields.name,
            description: fields.description,
            color: fields.color,
            start: fields.start,
            end: fields.end,
            days,
            created_at,
            updated_at,
        }
    }

    pub fn start(&self) -> CalendarDay {
        self.start
    }

    pub fn end(&self) -> CalendarDay {
        self.end
    }

    /// Materialized inclusive day list.
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Moves both bounds and rebuilds the day list.
    pub fn set_bounds(
        &mut self,
        start: CalendarDay,
        end: CalendarDay,
    ) -> Result<(), ValidationError> {
        ensure_ordered(start, end)?;
        self.start = start;
        self.end = end;
        self.days = materialize(start, end);
        Ok(())
    }

    /// Applies a partial update atomically.
    ///
    /// Returns whether the date bounds changed. On error `self` is untouched.
    pub fn apply_patch(&mut self, patch: &PeriodPatch) -> Result<bool, ValidationError> {
        let fields = PeriodFields::new(
            patch.name.as_deref().unwrap_or(self.name.as_str()),
            patch
                .description
                .as_deref()
                .unwrap_or(self.description.as_str()),
            match patch.color.as_deref() {
                Some(value) => Color::parse(value)?,
                None => self.color.clone(),
            },
            patch.start.unwrap_or(self.start),
            patch.end.unwrap_or(self.end),
        )?;

        let bounds_changed = fields.start != self.start || fields.end != self.end;
        self.name = fields.name;
        self.description = fields.description;
        self.color = fields.color;
        if bounds_changed {
            self.set_bounds(fields.start, fields.end)?;
        }
        Ok(bounds_changed)
    }

    /// Re-checks every field invariant, including the day list cache.
    pub fn validate(&self) -> Result<(), ValidationError> {
        PeriodFields::new(
            self.name.as_str(),
            self.description.as_str(),
            self.color.clone(),
            self.start,
            self.end,
        )?;
        if self.days != materialize(self.start, self.end) {
            return Err(ValidationError::StaleDays);
        }
        Ok(())
    }
}

fn materialize(start: CalendarDay, end: CalendarDay) -> Vec<CalendarDay> {
    // Bounds are validated before every call.
    date_range(start, end).unwrap_or_default()
}

/// Wire shape accepted when deserializing; `days` is derived, never trusted.
#[derive(Deserialize)]
struct PeriodRecord {
    id: PeriodId,
    agenda_id: AgendaId,
    name: String,
    #[serde(default)]
    description: String,
    color: Color,
    start: CalendarDay,
    end: CalendarDay,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    updated_at: i64,
}

impl TryFrom<PeriodRecord> for Period {
    type Error = ValidationError;

    fn try_from(record: PeriodRecord) -> Result<Self, Self::Error> {
        let fields = PeriodFields::new(
            record.name.as_str(),
            record.description.as_str(),
            record.color,
            record.start,
            record.end,
        )?;
        Ok(Period::new(
            record.id,
            record.agenda_id,
            fields,
            record.created_at,
            record.updated_at,
        ))
    }
}

/// User input for creating a period, typically from a committed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDraft {
    pub name: String,
    pub description: String,
    /// Raw color input; normalized during validation.
    pub color: String,
    pub start: Option<CalendarDay>,
    pub end: Option<CalendarDay>,
}

impl PeriodDraft {
    /// Draft covering `start..=end` with the default color and no description.
    pub fn new(name: impl Into<String>, start: CalendarDay, end: CalendarDay) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: Color::default().to_string(),
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Validates and normalizes every field.
    pub fn validate(&self) -> Result<PeriodFields, ValidationError> {
        let start = self.start.ok_or(ValidationError::MissingField("start"))?;
        let end = self.end.ok_or(ValidationError::MissingField("end"))?;
        if self.color.trim().is_empty() {
            return Err(ValidationError::MissingField("color"));
        }
        PeriodFields::new(
            self.name.as_str(),
            self.description.as_str(),
            Color::parse(self.color.as_str())?,
            start,
            end,
        )
    }
}

/// Partial period update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start: Option<CalendarDay>,
    pub end: Option<CalendarDay>,
}

impl PeriodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Checks the fields that can be validated without the stored period.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            normalize_name(name, Some(PERIOD_NAME_MAX_CHARS))?;
        }
        if let Some(description) = self.description.as_deref() {
            normalize_description(description, PERIOD_DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(color) = self.color.as_deref() {
            Color::parse(color)?;
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            ensure_ordered(start, end)?;
        }
        Ok(())
    }
}
