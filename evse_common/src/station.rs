//! Host collaborator contracts.
//!
//! The control unit never touches hardware directly. The host implements
//! [`StationHal`] (buttons, analog inputs, relays, lamps, watchdog, vehicle
//! and charger status) and optionally exposes a [`Display`].
//!
//! # Timing Contracts
//!
//! | Operation | Constraint |
//! |-----------|------------|
//! | every method | fast, synchronous, non-blocking |
//! | `feed_watchdog()` | called exactly once per cycle |
//! | `display()` | `None` is a valid configuration |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::channel::{Button, Indicator, Relay};
use crate::consts::{MAX_CURRENT, MAX_VOLTAGE, RATED_POWER_W, REMAINING_TIME_UNKNOWN};

bitflags! {
    /// Charger status flags published to the vehicle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChargerFlags: u8 {
        /// Energy transfer in progress.
        const CHARGING = 0x01;
        /// Connector lock engaged.
        const LOCKED   = 0x02;
    }
}

bitflags! {
    /// Charger fault flags published to the vehicle.
    ///
    /// Latched while the session is faulted, cleared on acknowledgement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChargerFault: u8 {
        const HANDSHAKE_TIMEOUT  = 0x01;
        const CABLE_DISCONNECTED = 0x02;
        const OVER_VOLTAGE       = 0x04;
        const VEHICLE_FAULT      = 0x08;
        const EMERGENCY_STOP     = 0x10;
    }
}

/// Vehicle-side status, updated by the external protocol layer. Read-only to the core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleStatus {
    /// Vehicle permits charging.
    pub charging_enabled: bool,
    /// Requested charge voltage [V].
    pub voltage_request: f64,
    /// Requested charge current [A].
    pub current_request: f64,
    /// State of charge [%].
    pub state_of_charge: u8,
    /// Raw vehicle fault flags (0 = no fault).
    pub fault_flags: u8,
}

/// Charger-side status written by the core, read by the protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargerStatus {
    /// Commanded output voltage [V].
    pub output_voltage: f64,
    /// Commanded output current [A].
    pub output_current: f64,
    /// Advertised voltage capability [V].
    pub available_voltage: f64,
    /// Advertised current capability [A].
    pub available_current: f64,
    /// Rated output power [W].
    pub rated_power_w: u32,
    /// Remaining charge time [min], `0xFFFF` when unknown.
    pub remaining_time_min: u16,
    pub flags: ChargerFlags,
    pub faults: ChargerFault,
}

impl Default for ChargerStatus {
    fn default() -> Self {
        Self {
            output_voltage: 0.0,
            output_current: 0.0,
            available_voltage: MAX_VOLTAGE,
            available_current: MAX_CURRENT,
            rated_power_w: RATED_POWER_W,
            remaining_time_min: REMAINING_TIME_UNKNOWN,
            flags: ChargerFlags::empty(),
            faults: ChargerFault::empty(),
        }
    }
}

/// Optional text display.
pub trait Display {
    /// Clear the frame buffer.
    fn clear(&mut self);

    /// Draw `text` with its baseline at (`x`, `y`) pixels.
    fn draw_text(&mut self, x: u8, y: u8, text: &str);

    /// Push the frame buffer to the panel.
    fn update(&mut self);
}

/// Host environment of the control unit.
///
/// Implementations must be fast and side-effecting; the core calls them
/// from a single thread once per cycle.
pub trait StationHal {
    /// Raw level of a button (`true` = pressed).
    fn button_level(&mut self, button: Button) -> bool;

    /// Control-pilot voltage [V].
    fn pilot_voltage(&mut self) -> f64;

    /// Measured DC output voltage [V].
    fn output_voltage(&mut self) -> f64;

    /// Drive a relay (`true` = closed).
    fn set_relay(&mut self, relay: Relay, closed: bool);

    /// Drive a status lamp.
    fn set_indicator(&mut self, indicator: Indicator, on: bool);

    /// Acknowledge the hardware watchdog.
    fn feed_watchdog(&mut self);

    /// Latest vehicle status from the protocol layer.
    fn vehicle_status(&mut self) -> VehicleStatus;

    /// Hand the charger status to the protocol layer.
    fn publish_charger_status(&mut self, status: &ChargerStatus);

    /// Display, if the station has one.
    fn display(&mut self) -> Option<&mut dyn Display> {
        None
    }
}
