//! Charging session state machine.
//!
//! IDLE → HANDSHAKE → INSULATION → PRECHARGE → CHARGING → COMPLETE → IDLE,
//! with ERROR/EMERGENCY (`Faulted`) reachable from every state and left
//! only by a stop-button acknowledgement.
//!
//! One [`Session::step`] per tick. Time is counted in ticks only:
//! `state_timer` restarts at 0 on every state change and both timers
//! advance exactly once per step, before any transition logic.
//!
//! | State | Entry | Per cycle | Exit |
//! |---|---|---|---|
//! | Idle | standby on, charging/fault off, setpoint 0 | relays open while unplugged | connected + start → Handshake |
//! | Handshake | - | - | vehicle enabled → Insulation; else timeout → fault |
//! | Insulation | lock + VP closed | - | timer > insulation → Precharge |
//! | Precharge | - | setpoint = clamp(request) | timer > precharge → main closed, Charging |
//! | Charging | standby off | blink, setpoint = clamp(request) | guards → fault; stop / vehicle stop → Complete |
//! | Complete | charging solid, main open, current 0 | - | timer ≥ settle → VP + lock open, Idle |
//! | Faulted | lamps fault, all relays open, setpoint 0 | - | stop → Idle |

use evse_common::channel::{Button, Indicator, Relay};
use evse_common::config::{StationConfig, TimingConfig};
use evse_common::session::{Fault, SessionState};
use evse_common::station::{ChargerFault, ChargerFlags, ChargerStatus, VehicleStatus};
use tracing::{debug, error, info};

use super::outputs::OutputImage;
use crate::input::sampler::CycleInputs;
use crate::safety::guards::FaultGuards;
use crate::safety::limiter::{SafetyLimiter, Setpoint};

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// State before the step.
    pub previous: SessionState,
    /// State after the step.
    pub current: SessionState,
}

impl StepOutcome {
    #[inline]
    pub fn transitioned(&self) -> bool {
        self.previous != self.current
    }

    /// Fault entered during this step, if any.
    #[inline]
    pub fn entered_fault(&self) -> Option<Fault> {
        if self.transitioned() {
            self.current.fault()
        } else {
            None
        }
    }
}

/// The single charging session of the station.
///
/// Created once in IDLE; mutated only by [`Session::step`].
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    state_timer: u32,
    blink_timer: u32,
    setpoint: Setpoint,
    outputs: OutputImage,
    charger: ChargerStatus,
    timing: TimingConfig,
    limiter: SafetyLimiter,
    guards: FaultGuards,
}

impl Session {
    pub fn new(config: &StationConfig) -> Self {
        let limiter = SafetyLimiter::from(&config.limits);
        let charger = ChargerStatus {
            available_voltage: limiter.max_voltage(),
            available_current: limiter.max_current(),
            rated_power_w: config.charger.rated_power_w,
            ..ChargerStatus::default()
        };

        let mut session = Self {
            state: SessionState::Idle,
            state_timer: 0,
            blink_timer: 0,
            setpoint: Setpoint::ZERO,
            outputs: OutputImage::default(),
            charger,
            timing: TimingConfig {
                // Zero would divide by zero in the blink phase.
                blink_period: config.timing.blink_period.max(1),
                ..config.timing
            },
            limiter,
            guards: FaultGuards::new(limiter, config.timing.handshake_timeout),
        };
        session.apply_entry(SessionState::Idle);
        session.outputs.open_all_relays();
        session.refresh_charger_status();
        session
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Ticks since the current state was entered.
    #[inline]
    pub const fn state_timer(&self) -> u32 {
        self.state_timer
    }

    #[inline]
    pub const fn blink_timer(&self) -> u32 {
        self.blink_timer
    }

    /// Commanded output setpoint.
    #[inline]
    pub const fn setpoint(&self) -> Setpoint {
        self.setpoint
    }

    #[inline]
    pub const fn outputs(&self) -> &OutputImage {
        &self.outputs
    }

    #[inline]
    pub const fn charger_status(&self) -> &ChargerStatus {
        &self.charger
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    /// Advance the session by one tick.
    pub fn step(&mut self, inputs: &CycleInputs, vehicle: &VehicleStatus) -> StepOutcome {
        let previous = self.state;
        self.state_timer = self.state_timer.saturating_add(1);
        self.blink_timer = self.blink_timer.wrapping_add(1);

        // Global override: preempts the state table for this cycle.
        if let Some(fault) = self.guards.emergency(inputs) {
            if self.state != SessionState::Faulted(fault) {
                self.enter_fault(fault);
            }
        } else {
            self.run_state(inputs, vehicle);
        }

        self.refresh_charger_status();
        StepOutcome {
            previous,
            current: self.state,
        }
    }

    fn run_state(&mut self, inputs: &CycleInputs, vehicle: &VehicleStatus) {
        match self.state {
            SessionState::Idle => {
                self.outputs.set_indicator(Indicator::Standby, true);
                self.outputs.set_indicator(Indicator::Charging, false);

                if !inputs.connected {
                    self.outputs.open_all_relays();
                    if inputs.edge(Button::Start) {
                        debug!("Start ignored: no vehicle connected");
                    }
                } else if inputs.edge(Button::Start) {
                    info!("Starting handshake...");
                    self.enter(SessionState::Handshake);
                }
            }

            SessionState::Handshake => {
                if vehicle.charging_enabled {
                    info!("Vehicle ready, starting insulation test");
                    self.enter(SessionState::Insulation);
                } else if let Some(fault) = self.guards.handshake(self.state_timer) {
                    self.enter_fault(fault);
                }
            }

            SessionState::Insulation => {
                if self.state_timer > self.timing.insulation {
                    self.enter(SessionState::Precharge);
                }
            }

            SessionState::Precharge => {
                self.setpoint = self.clamp_request(vehicle);
                if self.state_timer > self.timing.precharge {
                    info!("Main relay closed, charging");
                    self.enter(SessionState::Charging);
                }
            }

            SessionState::Charging => {
                if let Some(fault) = self.guards.charging(inputs, vehicle) {
                    self.enter_fault(fault);
                    return;
                }

                self.outputs.set_indicator(Indicator::Standby, false);
                let lit = self.blink_timer % self.timing.blink_period < self.timing.blink_on;
                self.outputs.set_indicator(Indicator::Charging, lit);
                self.setpoint = self.clamp_request(vehicle);

                if inputs.edge(Button::Stop) {
                    info!("User stop");
                    self.enter(SessionState::Complete);
                } else if !vehicle.charging_enabled {
                    info!("Vehicle stop request");
                    self.enter(SessionState::Complete);
                }
            }

            SessionState::Complete => {
                if self.state_timer >= self.timing.complete_settle {
                    self.outputs.set_relay(Relay::Vp, false);
                    self.outputs.set_relay(Relay::Lock, false);
                    info!("Session complete, connector released");
                    self.enter(SessionState::Idle);
                }
            }

            SessionState::Faulted(fault) => {
                if inputs.edge(Button::Stop) {
                    info!("Fault acknowledged: {fault}");
                    self.outputs.set_indicator(Indicator::Fault, false);
                    self.charger.faults = ChargerFault::empty();
                    self.enter(SessionState::Idle);
                }
            }
        }
    }

    // ─── Transitions ────────────────────────────────────────────────

    fn enter(&mut self, next: SessionState) {
        debug!(
            "{} -> {} after {} ticks",
            self.state.phase(),
            next.phase(),
            self.state_timer
        );
        self.state = next;
        self.state_timer = 0;
        self.apply_entry(next);
    }

    /// Single entry point into ERROR/EMERGENCY.
    fn enter_fault(&mut self, fault: Fault) {
        error!("Error: {fault}");
        self.charger.faults |= fault.charger_fault();
        self.enter(SessionState::Faulted(fault));
    }

    fn apply_entry(&mut self, state: SessionState) {
        match state {
            SessionState::Idle => {
                self.outputs.set_indicator(Indicator::Standby, true);
                self.outputs.set_indicator(Indicator::Charging, false);
                self.outputs.set_indicator(Indicator::Fault, false);
                self.setpoint = Setpoint::ZERO;
            }
            SessionState::Handshake | SessionState::Precharge => {}
            SessionState::Insulation => {
                self.outputs.set_relay(Relay::Lock, true);
                self.outputs.set_relay(Relay::Vp, true);
            }
            SessionState::Charging => {
                self.outputs.set_relay(Relay::Main, true);
                self.outputs.set_indicator(Indicator::Standby, false);
            }
            SessionState::Complete => {
                self.outputs.set_indicator(Indicator::Charging, true);
                self.outputs.set_relay(Relay::Main, false);
                self.setpoint.current = 0.0;
            }
            SessionState::Faulted(_) => {
                self.outputs.set_indicator(Indicator::Standby, false);
                self.outputs.set_indicator(Indicator::Charging, false);
                self.outputs.set_indicator(Indicator::Fault, true);
                self.outputs.open_all_relays();
                self.setpoint = Setpoint::ZERO;
            }
        }
    }

    fn clamp_request(&self, vehicle: &VehicleStatus) -> Setpoint {
        self.limiter
            .clamp(vehicle.voltage_request, vehicle.current_request)
    }

    fn refresh_charger_status(&mut self) {
        self.charger.output_voltage = self.setpoint.voltage;
        self.charger.output_current = self.setpoint.current;
        self.charger.flags.set(
            ChargerFlags::CHARGING,
            self.state == SessionState::Charging,
        );
        self.charger
            .flags
            .set(ChargerFlags::LOCKED, self.outputs.relay(Relay::Lock));
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
