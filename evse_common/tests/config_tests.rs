//! Station config loading tests.
//!
//! Loads the shipped `config/station.toml`, then checks that overrides
//! written to disk survive the loader and that bad files are reported
//! with the right `ConfigError` variant.

use evse_common::config::{ConfigError, ConfigLoader, LogLevel, StationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn shipped_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("config")
        .join("station.toml")
}

fn write(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("station.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn shipped_config_matches_defaults() {
    let config = StationConfig::load(&shipped_config()).unwrap();
    config.validate().unwrap();

    let defaults = StationConfig::default();
    assert_eq!(config.limits, defaults.limits);
    assert_eq!(config.pilot, defaults.pilot);
    assert_eq!(config.timing, defaults.timing);
    assert_eq!(config.charger, defaults.charger);
    assert_eq!(config.shared.log_level, LogLevel::Info);
}

#[test]
fn override_survives_loader() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        r#"
[limits]
max_voltage = 60.0

[timing]
complete_settle = 5
"#,
    );
    let config = StationConfig::load(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.limits.max_voltage, 60.0);
    assert_eq!(config.limits.max_current, 10.0);
    assert_eq!(config.timing.complete_settle, 5);
    assert_eq!(config.timing.handshake_timeout, 100);
}

#[test]
fn unknown_section_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "[mqtt]\nhost = \"localhost\"\n");
    assert!(matches!(
        StationConfig::load(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn loader_does_not_validate() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "[pilot]\nconnected_min = 10.0\nconnected_max = 8.0\n");
    let config = StationConfig::load(&path).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn missing_file() {
    let dir = TempDir::new().unwrap();
    let result = StationConfig::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}
