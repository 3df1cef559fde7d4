//! Core configuration.
//!
//! # Responsibility
//! - Load embedding-provided settings from TOML.
//! - Supply defaults for every key so an empty file is a valid config.
//!
//! # Invariants
//! - A loaded config has passed `validate`.
//! - Unknown keys are rejected rather than silently ignored.

use crate::calendar::grid::WeekStart;
use crate::model::agenda::{normalize_agenda_name, DEFAULT_AGENDA_NAME};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default cap on period bars rendered per grid cell.
pub const DEFAULT_MAX_VISIBLE_PERIODS: usize = 3;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// `trace|debug|info|warn|error`; build-mode default when absent.
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when absent.
    pub log_dir: Option<PathBuf>,
    /// SQLite file; an in-memory database is used when absent.
    pub database_path: Option<PathBuf>,
    pub week_start: WeekStart,
    pub max_visible_periods: usize,
    pub default_agenda_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            log_dir: None,
            database_path: None,
            week_start: WeekStart::default(),
            max_visible_periods: DEFAULT_MAX_VISIBLE_PERIODS,
            default_agenda_name: DEFAULT_AGENDA_NAME.to_string(),
        }
    }
}

impl CoreConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(content.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_visible_periods == 0 {
            return Err(ConfigError::Invalid(
                "max_visible_periods must be at least 1".to_string(),
            ));
        }
        normalize_agenda_name(self.default_agenda_name.as_str()).map_err(|err| {
            ConfigError::Invalid(format!("default_agenda_name: {err}"))
        })?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
