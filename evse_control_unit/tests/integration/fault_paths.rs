//! Integration test: fault entry, priority and acknowledgement.
//!
//! 1. Every fault source opens all relays and lights the fault lamp
//! 2. Guards outrank normal exits in the same cycle
//! 3. Only a stop press leaves the fault state

use evse_common::channel::{Button, Indicator, Relay};
use evse_common::config::StationConfig;
use evse_common::session::{Fault, SessionState};
use evse_common::station::{ChargerFault, VehicleStatus};
use evse_control_unit::cycle::CycleRunner;
use evse_control_unit::sim::{PILOT_PLUGGED, PILOT_UNPLUGGED, SimStation};

// ── Helpers ─────────────────────────────────────────────────────────

fn runner() -> CycleRunner<SimStation> {
    let mut runner =
        CycleRunner::new(&StationConfig::default(), SimStation::new(true)).unwrap();
    runner.hal_mut().pilot_voltage = PILOT_PLUGGED;
    runner
}

fn ready_vehicle() -> VehicleStatus {
    VehicleStatus {
        charging_enabled: true,
        voltage_request: 100.0,
        current_request: 8.0,
        state_of_charge: 50,
        fault_flags: 0,
    }
}

/// Press and release `button` over two ticks.
fn tap(runner: &mut CycleRunner<SimStation>, button: Button) {
    runner.hal_mut().press(button);
    runner.tick();
    runner.hal_mut().release(button);
    runner.tick();
}

fn start_handshake(runner: &mut CycleRunner<SimStation>) {
    runner.hal_mut().press(Button::Start);
    runner.tick();
    runner.hal_mut().release(Button::Start);
    assert_eq!(runner.session().state(), SessionState::Handshake);
}

fn to_charging(runner: &mut CycleRunner<SimStation>) {
    start_handshake(runner);
    runner.hal_mut().vehicle = ready_vehicle();
    runner.hal_mut().output_voltage = 100.0;
    for _ in 0..50 {
        runner.tick();
        if runner.session().state() == SessionState::Charging {
            return;
        }
    }
    panic!("never reached CHARGING");
}

fn assert_safe_fault(runner: &CycleRunner<SimStation>, fault: Fault) {
    assert_eq!(runner.session().state(), SessionState::Faulted(fault));
    let hal = runner.hal();
    assert!(Relay::ALL.iter().all(|&r| !hal.relay(r)));
    assert!(hal.indicator(Indicator::Fault));
    assert!(!hal.indicator(Indicator::Standby));
    assert!(!hal.indicator(Indicator::Charging));
    assert_eq!(hal.charger().output_current, 0.0);
    assert!(hal.charger().faults.contains(fault.charger_fault()));
    assert_eq!(
        hal.text_display().unwrap().shown()[1],
        fault.reason(),
        "fault frame drawn on entry"
    );
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn emergency_while_charging() {
    let mut runner = runner();
    to_charging(&mut runner);
    assert!(runner.hal().relay(Relay::Main));

    runner.hal_mut().press(Button::Emergency);
    runner.tick();
    assert_safe_fault(&runner, Fault::EmergencyStop);

    // Held button, release and re-press keep the same fault.
    for _ in 0..5 {
        runner.tick();
    }
    runner.hal_mut().release(Button::Emergency);
    runner.tick();
    tap(&mut runner, Button::Emergency);
    assert_safe_fault(&runner, Fault::EmergencyStop);
    // Fresh edge did not re-enter the fault: timer kept counting.
    assert_eq!(runner.session().state_timer(), 8);
}

#[test]
fn stop_acknowledges_fault() {
    let mut runner = runner();
    tap(&mut runner, Button::Emergency);
    assert_eq!(
        runner.session().state(),
        SessionState::Faulted(Fault::EmergencyStop)
    );

    // Start does nothing while faulted.
    tap(&mut runner, Button::Start);
    assert!(runner.session().state().is_faulted());

    tap(&mut runner, Button::Stop);
    assert_eq!(runner.session().state(), SessionState::Idle);
    let hal = runner.hal();
    assert!(!hal.indicator(Indicator::Fault));
    assert!(hal.indicator(Indicator::Standby));
    assert_eq!(hal.charger().faults, ChargerFault::empty());
}

#[test]
fn emergency_wins_over_stop_in_same_cycle() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().press(Button::Stop);
    runner.hal_mut().press(Button::Emergency);
    runner.tick();
    assert_eq!(
        runner.session().state(),
        SessionState::Faulted(Fault::EmergencyStop)
    );
}

#[test]
fn handshake_times_out_after_101_ticks() {
    let mut runner = runner();
    start_handshake(&mut runner);

    for _ in 0..100 {
        runner.tick();
    }
    assert_eq!(runner.session().state(), SessionState::Handshake);

    runner.tick();
    assert_safe_fault(&runner, Fault::HandshakeTimeout);
}

#[test]
fn cable_pulled_while_charging() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().pilot_voltage = PILOT_UNPLUGGED;
    runner.tick();
    assert_safe_fault(&runner, Fault::CableDisconnected);
}

#[test]
fn over_voltage_outranks_disconnect() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().pilot_voltage = PILOT_UNPLUGGED;
    runner.hal_mut().output_voltage = 115.5;
    runner.tick();
    assert_safe_fault(&runner, Fault::OverVoltage);
}

#[test]
fn over_voltage_margin_is_exclusive() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().output_voltage = 115.0;
    runner.tick();
    assert_eq!(runner.session().state(), SessionState::Charging);
}

#[test]
fn vehicle_fault_flags_abort_charging() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().vehicle.fault_flags = 0x01;
    runner.tick();
    assert_safe_fault(&runner, Fault::VehicleFault);
}

#[test]
fn guard_outranks_user_stop() {
    let mut runner = runner();
    to_charging(&mut runner);
    runner.hal_mut().press(Button::Stop);
    runner.hal_mut().pilot_voltage = PILOT_UNPLUGGED;
    runner.tick();
    assert_eq!(
        runner.session().state(),
        SessionState::Faulted(Fault::CableDisconnected)
    );
}

#[test]
fn watchdog_fed_through_faults() {
    let mut runner = runner();
    to_charging(&mut runner);
    let before = runner.hal().watchdog_feeds();
    tap(&mut runner, Button::Emergency);
    tap(&mut runner, Button::Stop);
    assert_eq!(runner.hal().watchdog_feeds(), before + 4);
}
