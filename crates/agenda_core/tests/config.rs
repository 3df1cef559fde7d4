use agenda_core::{ConfigError, CoreConfig, WeekStart};
use std::io::Write;

#[test]
fn load_reads_every_key_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "log_level = \"warn\"\n\
         database_path = \"/tmp/agenda.db\"\n\
         week_start = \"monday\"\n\
         max_visible_periods = 5\n\
         default_agenda_name = \"Family\""
    )
    .unwrap();
    drop(file);

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config.log_level.as_deref(), Some("warn"));
    assert_eq!(
        config.database_path.as_deref(),
        Some(std::path::Path::new("/tmp/agenda.db"))
    );
    assert_eq!(config.week_start, WeekStart::Monday);
    assert_eq!(config.max_visible_periods, 5);
    assert_eq!(config.default_agenda_name, "Family");
    assert!(config.log_dir.is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn blank_default_agenda_name_is_invalid() {
    let err = CoreConfig::from_toml_str("default_agenda_name = \"   \"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn relative_log_dir_is_invalid() {
    let err = CoreConfig::from_toml_str("log_dir = \"logs\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unknown_week_start_is_a_parse_error() {
    let err = CoreConfig::from_toml_str("week_start = \"friday\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
