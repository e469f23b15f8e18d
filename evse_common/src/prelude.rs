//! Prelude module for common re-exports.
//!
//! ```rust
//! use evse_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, StationConfig};

// ─── Station Constants ──────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_MS, MAX_CURRENT, MAX_VOLTAGE};

// ─── Channels ───────────────────────────────────────────────────────
pub use crate::channel::{Button, Indicator, Relay};

// ─── Session ────────────────────────────────────────────────────────
pub use crate::session::{Fault, SessionPhase, SessionState};

// ─── Host Contracts ─────────────────────────────────────────────────
pub use crate::station::{
    ChargerFault, ChargerFlags, ChargerStatus, Display, StationHal, VehicleStatus,
};
