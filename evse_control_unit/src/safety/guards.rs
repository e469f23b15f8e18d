//! Cross-cutting fault guards.
//!
//! Evaluated by the session before its normal exit conditions. A guard
//! that fires wins over every other exit that is true in the same cycle.
//!
//! Priority: emergency edge (any state) → over-voltage → cable
//! disconnect → vehicle fault flags (CHARGING) / handshake timeout
//! (HANDSHAKE).

use evse_common::channel::Button;
use evse_common::session::Fault;
use evse_common::station::VehicleStatus;

use super::limiter::SafetyLimiter;
use crate::input::sampler::CycleInputs;

#[derive(Debug, Clone, Copy)]
pub struct FaultGuards {
    limiter: SafetyLimiter,
    handshake_timeout: u32,
}

impl FaultGuards {
    pub const fn new(limiter: SafetyLimiter, handshake_timeout: u32) -> Self {
        Self {
            limiter,
            handshake_timeout,
        }
    }

    /// Operator emergency stop. Checked first, every cycle, in every state.
    #[inline]
    pub fn emergency(&self, inputs: &CycleInputs) -> Option<Fault> {
        inputs
            .edge(Button::Emergency)
            .then_some(Fault::EmergencyStop)
    }

    /// Violations while energy is flowing.
    pub fn charging(&self, inputs: &CycleInputs, vehicle: &VehicleStatus) -> Option<Fault> {
        if self.limiter.over_voltage(inputs.output_voltage) {
            Some(Fault::OverVoltage)
        } else if !inputs.connected {
            Some(Fault::CableDisconnected)
        } else if vehicle.fault_flags != 0 {
            Some(Fault::VehicleFault)
        } else {
            None
        }
    }

    /// Vehicle did not enable charging in time.
    #[inline]
    pub fn handshake(&self, state_timer: u32) -> Option<Fault> {
        (state_timer > self.handshake_timeout).then_some(Fault::HandshakeTimeout)
    }
}
