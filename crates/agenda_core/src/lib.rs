//! Core logic for the colored agenda calendar.
//! This crate is the single source of truth for calendar and period invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod index;
pub mod logging;
pub mod model;
pub mod selection;
pub mod service;
pub mod store;

pub use calendar::day::{CalendarDay, DayParseError};
pub use calendar::grid::{
    days_in_month, month_grid, DayCell, GridError, MonthCursor, MonthGrid, WeekStart,
};
pub use calendar::range::{date_range, date_range_str, format_day_range, RangeError};
pub use config::{ConfigError, CoreConfig};
pub use index::period_index::{DayCoverage, PeriodIndex};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::agenda::{Agenda, AgendaId, AgendaPatch};
pub use model::color::Color;
pub use model::period::{Period, PeriodDraft, PeriodId, PeriodPatch};
pub use model::validation::ValidationError;
pub use selection::{CommittedRange, SelectionMachine, SelectionState};
pub use service::{AgendaService, AgendaSession, ServiceError, SessionError, SessionFeed};
pub use store::{AgendaStore, Snapshot, SqliteAgendaStore, StoreError, StoreResult, Subscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
