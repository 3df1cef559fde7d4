//! Calendar computations: day identifiers, month grids and range expansion.
//!
//! # Responsibility
//! - Pure, I/O-free date arithmetic shared by the index, the selection state
//!   machine and the store.
//!
//! # Invariants
//! - Days are timezone-naive civil dates.

pub mod day;
pub mod grid;
pub mod range;

pub use chrono::Weekday;
