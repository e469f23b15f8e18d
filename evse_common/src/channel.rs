//! Station I/O channel identifiers.
//!
//! Buttons, relays and indicators are closed enums with an exhaustive
//! `ALL` table and a dense `index()`, so per-channel arrays are sized by
//! `COUNT` and adding a channel is a compile-time-checked change.

use serde::{Deserialize, Serialize};

/// Operator push buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Button {
    /// Start a charging session.
    Start = 0,
    /// Settings menu (monitored, currently unused by the session).
    Setting = 1,
    /// Stop charging / acknowledge a fault.
    Stop = 2,
    /// Emergency stop.
    Emergency = 3,
}

impl Button {
    /// Number of buttons.
    pub const COUNT: usize = 4;

    /// Every button, in index order.
    pub const ALL: [Button; Self::COUNT] =
        [Self::Start, Self::Setting, Self::Stop, Self::Emergency];

    /// Dense array index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Setting => "setting",
            Self::Stop => "stop",
            Self::Emergency => "emergency",
        }
    }
}

/// Switched power paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Relay {
    /// Main DC output contactor.
    Main = 0,
    /// Precharge / vehicle-power auxiliary relay.
    Vp = 1,
    /// Connector lock solenoid.
    Lock = 2,
}

impl Relay {
    /// Number of relays.
    pub const COUNT: usize = 3;

    /// Every relay, in index order.
    pub const ALL: [Relay; Self::COUNT] = [Self::Main, Self::Vp, Self::Lock];

    /// Dense array index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Vp => "vp",
            Self::Lock => "lock",
        }
    }
}

/// Front panel status lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Indicator {
    /// Orange standby lamp.
    Standby = 0,
    /// Green charging lamp.
    Charging = 1,
    /// Red fault lamp.
    Fault = 2,
}

impl Indicator {
    /// Number of indicators.
    pub const COUNT: usize = 3;

    /// Every indicator, in index order.
    pub const ALL: [Indicator; Self::COUNT] = [Self::Standby, Self::Charging, Self::Fault];

    /// Dense array index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::Charging => "charging",
            Self::Fault => "fault",
        }
    }
}
