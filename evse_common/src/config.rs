//! Configuration loading traits and types.
//!
//! Station configuration is fixed at startup: electrical limits, pilot
//! band, session timing in ticks and charger parameters. Every section is
//! optional in TOML and falls back to the constants in [`crate::consts`].
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "evse-bay-01"
//!
//! [limits]
//! max_voltage = 110.0
//! max_current = 10.0
//!
//! [timing]
//! handshake_timeout = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    BLINK_ON_TICKS, BLINK_PERIOD_TICKS, COMPLETE_SETTLE_TICKS, CYCLE_TIME_MS,
    DISPLAY_INTERVAL_TICKS, HANDSHAKE_TIMEOUT_TICKS, INSULATION_TICKS, MAX_CURRENT, MAX_VOLTAGE,
    OVER_VOLTAGE_MARGIN, PILOT_CONNECTED_MAX, PILOT_CONNECTED_MIN, PRECHARGE_TICKS,
    RATED_POWER_W,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common fields shared by every EVSE service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Station instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "evse-station".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Electrical output limits. The binding constraint on every setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum commanded voltage [V].
    pub max_voltage: f64,
    /// Maximum commanded current [A].
    pub max_current: f64,
    /// Allowed measured overshoot above `max_voltage` before faulting [V].
    pub over_voltage_margin: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_voltage: MAX_VOLTAGE,
            max_current: MAX_CURRENT,
            over_voltage_margin: OVER_VOLTAGE_MARGIN,
        }
    }
}

/// Control-pilot voltage band meaning "vehicle connected" (both bounds exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PilotConfig {
    pub connected_min: f64,
    pub connected_max: f64,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            connected_min: PILOT_CONNECTED_MIN,
            connected_max: PILOT_CONNECTED_MAX,
        }
    }
}

/// Session timing. All values except `cycle_time_ms` are in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Loop pacing [ms]. Never used by the state machine itself.
    pub cycle_time_ms: u64,
    pub handshake_timeout: u32,
    pub insulation: u32,
    pub precharge: u32,
    pub complete_settle: u32,
    pub blink_period: u32,
    pub blink_on: u32,
    pub display_interval: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cycle_time_ms: CYCLE_TIME_MS,
            handshake_timeout: HANDSHAKE_TIMEOUT_TICKS,
            insulation: INSULATION_TICKS,
            precharge: PRECHARGE_TICKS,
            complete_settle: COMPLETE_SETTLE_TICKS,
            blink_period: BLINK_PERIOD_TICKS,
            blink_on: BLINK_ON_TICKS,
            display_interval: DISPLAY_INTERVAL_TICKS,
        }
    }
}

/// Parameters advertised to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargerConfig {
    /// Rated output power [W].
    pub rated_power_w: u32,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            rated_power_w: RATED_POWER_W,
        }
    }
}

/// Complete station configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub pilot: PilotConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub charger: ChargerConfig,
}

impl StationConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let l = &self.limits;
        if !(l.max_voltage.is_finite() && l.max_voltage > 0.0) {
            return Err(invalid(format!("max_voltage must be > 0, got {}", l.max_voltage)));
        }
        if !(l.max_current.is_finite() && l.max_current > 0.0) {
            return Err(invalid(format!("max_current must be > 0, got {}", l.max_current)));
        }
        if !(l.over_voltage_margin.is_finite() && l.over_voltage_margin >= 0.0) {
            return Err(invalid(format!(
                "over_voltage_margin must be >= 0, got {}",
                l.over_voltage_margin
            )));
        }

        let p = &self.pilot;
        if !(p.connected_min < p.connected_max) {
            return Err(invalid(format!(
                "pilot band empty: {} .. {}",
                p.connected_min, p.connected_max
            )));
        }

        let t = &self.timing;
        if t.cycle_time_ms == 0 {
            return Err(invalid("cycle_time_ms must be > 0".to_string()));
        }
        if t.blink_period == 0 || t.blink_on > t.blink_period {
            return Err(invalid(format!(
                "blink_on ({}) must not exceed a non-zero blink_period ({})",
                t.blink_on, t.blink_period
            )));
        }
        if t.display_interval == 0 {
            return Err(invalid("display_interval must be > 0".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Any serde-deserializable struct can use ConfigLoader.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
