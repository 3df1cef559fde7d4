//! Field validation shared by agendas and periods.
//!
//! # Invariants
//! - Validation never mutates input; it returns normalized copies.
//! - Lengths are counted in characters, not bytes.

use crate::calendar::day::CalendarDay;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Synchronous validation failures, reported before any store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was not provided.
    MissingField(&'static str),
    /// Name is empty after trimming.
    EmptyName,
    NameTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    /// Color is not a 3- or 6-digit hex value.
    InvalidColor(String),
    EndBeforeStart {
        start: CalendarDay,
        end: CalendarDay,
    },
    /// Materialized day list does not match the period bounds.
    StaleDays,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::NameTooLong { max, actual } => {
                write!(f, "name has {actual} characters; at most {max} allowed")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "description has {actual} characters; at most {max} allowed")
            }
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`; expected #RRGGBB"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            Self::StaleDays => write!(f, "day list does not match the period bounds"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects empty or over-long names.
pub(crate) fn normalize_name(
    value: &str,
    max_chars: Option<usize>,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if let Some(max) = max_chars {
        let actual = trimmed.chars().count();
        if actual > max {
            return Err(ValidationError::NameTooLong { max, actual });
        }
    }
    Ok(trimmed.to_string())
}

/// Trims `value` and rejects over-long descriptions. Empty is allowed.
pub(crate) fn normalize_description(
    value: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let actual = trimmed.chars().count();
    if actual > max_chars {
        return Err(ValidationError::DescriptionTooLong {
            max: max_chars,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_ordered(start: CalendarDay, end: CalendarDay) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, normalize_name, ValidationError};

    #[test]
    fn name_is_trimmed_and_counted_in_chars() {
        assert_eq!(normalize_name("  Vacances  ", Some(50)).unwrap(), "Vacances");
        assert_eq!(normalize_name("   ", Some(50)), Err(ValidationError::EmptyName));
        let accented = "é".repeat(50);
        assert!(normalize_name(&accented, Some(50)).is_ok());
        let too_long = "é".repeat(51);
        assert_eq!(
            normalize_name(&too_long, Some(50)),
            Err(ValidationError::NameTooLong { max: 50, actual: 51 })
        );
    }

    #[test]
    fn description_may_be_empty_but_not_too_long() {
        assert_eq!(normalize_description("  ", 200).unwrap(), "");
        assert!(matches!(
            normalize_description(&"x".repeat(201), 200),
            Err(ValidationError::DescriptionTooLong { max: 200, actual: 201 })
        ));
    }
}
