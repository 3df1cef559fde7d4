//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep embedding layers decoupled from storage details.
//! - Carry per-view session state fed by store subscriptions.

pub mod agenda_service;
pub mod feed;
pub mod session;

pub use agenda_service::{AgendaService, ServiceError, ServiceResult};
pub use feed::SessionFeed;
pub use session::{AgendaSession, SessionError};
