//! Output setpoint clamping.
//!
//! The station maxima are the binding constraint, whatever the vehicle
//! declares. Limits are fixed at construction.

use evse_common::config::LimitsConfig;

/// Commanded output setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Setpoint {
    /// [V]
    pub voltage: f64,
    /// [A]
    pub current: f64,
}

impl Setpoint {
    pub const ZERO: Self = Self {
        voltage: 0.0,
        current: 0.0,
    };
}

/// Pure clamp of requested voltage/current to the station limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyLimiter {
    max_voltage: f64,
    max_current: f64,
    over_voltage_margin: f64,
}

impl SafetyLimiter {
    pub const fn new(max_voltage: f64, max_current: f64, over_voltage_margin: f64) -> Self {
        Self {
            max_voltage,
            max_current,
            over_voltage_margin,
        }
    }

    /// `(min(v, max_voltage), min(i, max_current))`; negative or NaN requests give 0.
    #[inline]
    pub fn clamp(&self, requested_voltage: f64, requested_current: f64) -> Setpoint {
        Setpoint {
            voltage: limit(requested_voltage, self.max_voltage),
            current: limit(requested_current, self.max_current),
        }
    }

    /// Measured voltage beyond `max_voltage + over_voltage_margin`.
    #[inline]
    pub fn over_voltage(&self, measured: f64) -> bool {
        measured > self.max_voltage + self.over_voltage_margin
    }

    #[inline]
    pub const fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    #[inline]
    pub const fn max_current(&self) -> f64 {
        self.max_current
    }
}

impl From<&LimitsConfig> for SafetyLimiter {
    fn from(cfg: &LimitsConfig) -> Self {
        Self::new(cfg.max_voltage, cfg.max_current, cfg.over_voltage_margin)
    }
}

impl Default for SafetyLimiter {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

#[inline]
fn limit(requested: f64, max: f64) -> f64 {
    if requested.is_nan() || requested <= 0.0 {
        0.0
    } else {
        requested.min(max)
    }
}
