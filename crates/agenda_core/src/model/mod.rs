//! Domain model for agendas and their periods.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field validation so every write path enforces the same rules.
//!
//! # Invariants
//! - Every period belongs to exactly one agenda through `agenda_id`.
//! - A period's day list is derived from its bounds, never stored independently.

pub mod agenda;
pub mod color;
pub mod period;
pub mod validation;
