//! Integration test: a complete plug-in → charge → release session.

use evse_common::channel::{Indicator, Relay};
use evse_common::config::StationConfig;
use evse_common::session::{SessionPhase, SessionState};
use evse_common::station::{ChargerFault, ChargerFlags};
use evse_control_unit::cycle::CycleRunner;
use evse_control_unit::sim::{SimStation, VehicleModel};

// ── Helpers ─────────────────────────────────────────────────────────

const DT: f64 = 0.1;

fn runner(with_display: bool) -> CycleRunner<SimStation> {
    CycleRunner::new(&StationConfig::default(), SimStation::new(with_display)).unwrap()
}

/// Run `ticks` cycles with the scripted vehicle, recording each new phase.
fn drive(
    runner: &mut CycleRunner<SimStation>,
    vehicle: &mut VehicleModel,
    ticks: u64,
    mut each: impl FnMut(&CycleRunner<SimStation>),
) -> Vec<SessionPhase> {
    let mut phases = vec![runner.session().state().phase()];
    for _ in 0..ticks {
        vehicle.advance(runner.hal_mut(), DT);
        let outcome = runner.tick();
        if outcome.transitioned() {
            phases.push(outcome.current.phase());
        }
        each(runner);
    }
    phases
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn scripted_vehicle_completes_a_session() {
    let mut runner = runner(true);
    let mut vehicle = VehicleModel::default();

    let phases = drive(&mut runner, &mut vehicle, 250, |_| {});
    assert_eq!(
        phases,
        vec![
            SessionPhase::Idle,
            SessionPhase::Handshake,
            SessionPhase::Insulation,
            SessionPhase::Precharge,
            SessionPhase::Charging,
            SessionPhase::Complete,
            SessionPhase::Idle,
        ]
    );

    assert_eq!(runner.session().state(), SessionState::Idle);
    assert!(vehicle.soc() >= vehicle.target_soc);

    let hal = runner.hal();
    assert!(Relay::ALL.iter().all(|&r| !hal.relay(r)));
    assert!(hal.indicator(Indicator::Standby));
    assert!(!hal.indicator(Indicator::Fault));
    assert_eq!(hal.charger().faults, ChargerFault::empty());
    assert!(!hal.charger().flags.contains(ChargerFlags::LOCKED));
}

#[test]
fn watchdog_fed_once_per_tick() {
    let mut runner = runner(false);
    let mut vehicle = VehicleModel::default();
    let mut expected = 0;
    drive(&mut runner, &mut vehicle, 200, |r| {
        expected += 1;
        assert_eq!(r.hal().watchdog_feeds(), expected);
    });
}

#[test]
fn main_relay_and_current_only_while_charging() {
    let mut runner = runner(false);
    let mut vehicle = VehicleModel::default();
    drive(&mut runner, &mut vehicle, 250, |r| {
        let state = r.session().state();
        let hal = r.hal();
        assert_eq!(hal.relay(Relay::Main), state == SessionState::Charging);
        if !matches!(state, SessionState::Charging | SessionState::Precharge) {
            assert_eq!(hal.charger().output_current, 0.0);
        }
        assert!(hal.charger().output_current <= 10.0);
        assert!(hal.charger().output_voltage <= 110.0);
        assert_eq!(
            hal.charger().flags.contains(ChargerFlags::CHARGING),
            state == SessionState::Charging
        );
    });
}

#[test]
fn requested_current_is_clamped_to_station_limit() {
    let mut runner = runner(false);
    let mut vehicle = VehicleModel::default();
    let mut peak: f64 = 0.0;
    drive(&mut runner, &mut vehicle, 120, |r| {
        peak = peak.max(r.hal().charger().output_current);
    });
    // Vehicle asks for 16 A.
    assert_eq!(peak, 10.0);
}

#[test]
fn charging_lamp_blinks() {
    let mut runner = runner(false);
    let mut vehicle = VehicleModel::default();
    let mut on = 0u32;
    let mut off = 0u32;
    drive(&mut runner, &mut vehicle, 90, |r| {
        if r.session().state() == SessionState::Charging {
            if r.hal().indicator(Indicator::Charging) {
                on += 1;
            } else {
                off += 1;
            }
        }
    });
    assert!(on > 0 && off > 0);
}

#[test]
fn display_refreshes_periodically_while_charging() {
    let mut runner = runner(true);
    let mut vehicle = VehicleModel::default();
    drive(&mut runner, &mut vehicle, 60, |_| {});
    assert_eq!(runner.session().state(), SessionState::Charging);

    let shown = runner.hal().text_display().unwrap().shown();
    assert_eq!(shown[0], "CHARGING");
    assert!(shown[1].ends_with("10.0A"));
    assert!(shown[2].starts_with("SOC: "));
}

#[test]
fn session_runs_without_display() {
    let mut runner = runner(false);
    let mut vehicle = VehicleModel::default();
    let phases = drive(&mut runner, &mut vehicle, 250, |_| {});
    assert_eq!(phases.last(), Some(&SessionPhase::Idle));
    assert!(runner.hal().text_display().is_none());
    assert_eq!(runner.frames(), 0);
}
