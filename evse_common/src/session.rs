//! Charging session state types.
//!
//! [`SessionState`] is what the state machine holds. ERROR and EMERGENCY
//! share a single [`SessionState::Faulted`] variant carrying the [`Fault`]
//! reason; [`SessionPhase`] is the flat eight-way view used for telemetry
//! and the display.

use serde::{Deserialize, Serialize};

use crate::station::ChargerFault;

/// Reason a session was forced into the fault state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Fault {
    /// Vehicle never reported charging-enabled during HANDSHAKE.
    HandshakeTimeout = 0,
    /// Control pilot left the connected band while charging.
    CableDisconnected = 1,
    /// Measured output voltage above the allowed margin.
    OverVoltage = 2,
    /// Vehicle reported fault flags while charging.
    VehicleFault = 3,
    /// Emergency stop button pressed.
    EmergencyStop = 4,
}

impl Fault {
    /// Operator-facing reason text.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::HandshakeTimeout => "Handshake Timeout",
            Self::CableDisconnected => "Cable Disconnected",
            Self::OverVoltage => "Over Voltage Protection",
            Self::VehicleFault => "Vehicle Fault",
            Self::EmergencyStop => "Emergency Stop",
        }
    }

    #[inline]
    pub const fn is_emergency(self) -> bool {
        matches!(self, Self::EmergencyStop)
    }

    /// Fault bit published to the vehicle protocol layer.
    pub const fn charger_fault(self) -> ChargerFault {
        match self {
            Self::HandshakeTimeout => ChargerFault::HANDSHAKE_TIMEOUT,
            Self::CableDisconnected => ChargerFault::CABLE_DISCONNECTED,
            Self::OverVoltage => ChargerFault::OVER_VOLTAGE,
            Self::VehicleFault => ChargerFault::VEHICLE_FAULT,
            Self::EmergencyStop => ChargerFault::EMERGENCY_STOP,
        }
    }
}

impl core::fmt::Display for Fault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Current state of the charging session. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for a cable and a start press.
    #[default]
    Idle,
    /// Waiting for the vehicle to enable charging.
    Handshake,
    /// Connector locked, VP on, insulation check running.
    Insulation,
    /// Setpoints ramped, main contactor still open.
    Precharge,
    /// Main contactor closed, energy flowing.
    Charging,
    /// Main contactor open, waiting before unlocking.
    Complete,
    /// Terminal until acknowledged with the stop button.
    Faulted(Fault),
}

impl SessionState {
    /// Flat telemetry view of this state.
    pub const fn phase(self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Handshake => SessionPhase::Handshake,
            Self::Insulation => SessionPhase::Insulation,
            Self::Precharge => SessionPhase::Precharge,
            Self::Charging => SessionPhase::Charging,
            Self::Complete => SessionPhase::Complete,
            Self::Faulted(fault) if fault.is_emergency() => SessionPhase::Emergency,
            Self::Faulted(_) => SessionPhase::Error,
        }
    }

    /// Fault reason, if faulted.
    #[inline]
    pub const fn fault(self) -> Option<Fault> {
        match self {
            Self::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_faulted(self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// Eight-way session phase (telemetry / display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SessionPhase {
    #[default]
    Idle = 0,
    Handshake = 1,
    Insulation = 2,
    Precharge = 3,
    Charging = 4,
    Complete = 5,
    Error = 6,
    Emergency = 7,
}

impl SessionPhase {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Handshake),
            2 => Some(Self::Insulation),
            3 => Some(Self::Precharge),
            4 => Some(Self::Charging),
            5 => Some(Self::Complete),
            6 => Some(Self::Error),
            7 => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Upper-case name shown on the display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Handshake => "HANDSHAKE",
            Self::Insulation => "INSULATION",
            Self::Precharge => "PRECHARGE",
            Self::Charging => "CHARGING",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl core::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
