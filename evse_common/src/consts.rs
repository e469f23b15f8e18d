//! Station-wide constants for the EVSE workspace.
//!
//! Single source of truth for the default electrical limits, session
//! timing (in ticks) and charger parameters. [`crate::config::StationConfig`]
//! takes its defaults from here.

use static_assertions::const_assert;

// ─── Electrical Limits ──────────────────────────────────────────────

/// Maximum output voltage the station will ever command [V].
pub const MAX_VOLTAGE: f64 = 110.0;

/// Maximum output current the station will ever command [A].
pub const MAX_CURRENT: f64 = 10.0;

/// Measured output voltage above `MAX_VOLTAGE + OVER_VOLTAGE_MARGIN` is a fault [V].
pub const OVER_VOLTAGE_MARGIN: f64 = 5.0;

/// Lower bound (exclusive) of the control-pilot "vehicle connected" band [V].
pub const PILOT_CONNECTED_MIN: f64 = 8.0;

/// Upper bound (exclusive) of the control-pilot "vehicle connected" band [V].
pub const PILOT_CONNECTED_MAX: f64 = 10.0;

// ─── Session Timing [ticks] ─────────────────────────────────────────

/// Nominal cycle time of the control loop [ms]. Pacing only.
pub const CYCLE_TIME_MS: u64 = 100;

/// HANDSHAKE faults once its timer exceeds this.
pub const HANDSHAKE_TIMEOUT_TICKS: u32 = 100;

/// INSULATION advances once its timer exceeds this.
pub const INSULATION_TICKS: u32 = 10;

/// PRECHARGE closes the main relay once its timer exceeds this.
pub const PRECHARGE_TICKS: u32 = 10;

/// COMPLETE releases lock and VP relays once its timer reaches this.
pub const COMPLETE_SETTLE_TICKS: u32 = 30;

/// Charging indicator blink period.
pub const BLINK_PERIOD_TICKS: u32 = 10;

/// Ticks of each blink period the charging indicator is lit.
pub const BLINK_ON_TICKS: u32 = 5;

/// Display refresh interval.
pub const DISPLAY_INTERVAL_TICKS: u32 = 10;

// ─── Charger Parameters ─────────────────────────────────────────────

/// Rated output power advertised to the vehicle [W].
pub const RATED_POWER_W: u32 = 1000;

/// Remaining charge time value meaning "unknown" [min].
pub const REMAINING_TIME_UNKNOWN: u16 = 0xFFFF;

/// Maximum characters on one display line.
pub const DISPLAY_LINE_LEN: usize = 24;

const_assert!(BLINK_ON_TICKS < BLINK_PERIOD_TICKS);
const_assert!(DISPLAY_INTERVAL_TICKS > 0);
const_assert!(INSULATION_TICKS < HANDSHAKE_TIMEOUT_TICKS);
const_assert!(MAX_VOLTAGE > 0.0 && MAX_CURRENT > 0.0);
const_assert!(PILOT_CONNECTED_MIN < PILOT_CONNECTED_MAX);
