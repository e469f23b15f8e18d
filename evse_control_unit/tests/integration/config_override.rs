//! Integration test: a TOML override changes limits and timing end to end.

use std::fs;

use evse_common::channel::Button;
use evse_common::config::{ConfigLoader, StationConfig};
use evse_common::session::{Fault, SessionState};
use evse_common::station::VehicleStatus;
use evse_control_unit::cycle::CycleRunner;
use evse_control_unit::sim::{PILOT_PLUGGED, SimStation};
use tempfile::TempDir;

fn load(toml: &str) -> StationConfig {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("station.toml");
    fs::write(&path, toml).unwrap();
    let config = StationConfig::load(&path).unwrap();
    config.validate().unwrap();
    config
}

fn start(runner: &mut CycleRunner<SimStation>) {
    runner.hal_mut().pilot_voltage = PILOT_PLUGGED;
    runner.hal_mut().press(Button::Start);
    runner.tick();
    runner.hal_mut().release(Button::Start);
}

#[test]
fn lower_current_limit_clamps_request() {
    let config = load(
        r#"
[limits]
max_current = 6.0
"#,
    );
    let mut runner = CycleRunner::new(&config, SimStation::new(false)).unwrap();
    start(&mut runner);
    runner.hal_mut().vehicle = VehicleStatus {
        charging_enabled: true,
        voltage_request: 100.0,
        current_request: 8.0,
        state_of_charge: 20,
        fault_flags: 0,
    };
    for _ in 0..30 {
        runner.tick();
    }
    assert_eq!(runner.session().state(), SessionState::Charging);
    assert_eq!(runner.hal().charger().output_current, 6.0);
    assert_eq!(runner.hal().charger().available_current, 6.0);
}

#[test]
fn shorter_handshake_timeout() {
    let config = load(
        r#"
[timing]
handshake_timeout = 5
"#,
    );
    let mut runner = CycleRunner::new(&config, SimStation::new(false)).unwrap();
    start(&mut runner);
    for _ in 0..6 {
        runner.tick();
    }
    assert_eq!(
        runner.session().state(),
        SessionState::Faulted(Fault::HandshakeTimeout)
    );
}

#[test]
fn pilot_band_override() {
    let config = load(
        r#"
[pilot]
connected_min = 5.0
connected_max = 7.0
"#,
    );
    let mut runner = CycleRunner::new(&config, SimStation::new(false)).unwrap();
    // 9 V is outside the custom band.
    start(&mut runner);
    assert_eq!(runner.session().state(), SessionState::Idle);

    runner.hal_mut().pilot_voltage = 6.0;
    runner.hal_mut().press(Button::Start);
    runner.tick();
    assert_eq!(runner.session().state(), SessionState::Handshake);
}
