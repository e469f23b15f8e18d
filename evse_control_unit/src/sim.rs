//! Simulated station host.
//!
//! [`SimStation`] is an in-memory [`StationHal`]: buttons, pilot and output
//! voltage are plain fields, relay/lamp writes and watchdog feeds are
//! recorded. [`VehicleModel`] scripts a vehicle through a full session for
//! the simulator binary.

use evse_common::channel::{Button, Indicator, Relay};
use evse_common::station::{ChargerStatus, Display, StationHal, VehicleStatus};
use tracing::{debug, trace};

/// Pilot voltage with no vehicle attached [V].
pub const PILOT_UNPLUGGED: f64 = 12.0;

/// Pilot voltage with a vehicle attached [V].
pub const PILOT_PLUGGED: f64 = 9.0;

// ─── Display ────────────────────────────────────────────────────────

/// Text-buffer display. `shown()` is the last pushed frame.
#[derive(Debug, Clone, Default)]
pub struct TextDisplay {
    pending: Vec<String>,
    shown: Vec<String>,
    updates: u64,
}

impl TextDisplay {
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl Display for TextDisplay {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_text(&mut self, _x: u8, _y: u8, text: &str) {
        self.pending.push(text.to_string());
    }

    fn update(&mut self) {
        self.shown = self.pending.clone();
        self.updates += 1;
        debug!("display: {}", self.shown.join(" | "));
    }
}

// ─── Station ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SimStation {
    /// Raw level per button.
    pub buttons: [bool; Button::COUNT],
    /// Control-pilot voltage [V].
    pub pilot_voltage: f64,
    /// Measured output voltage [V].
    pub output_voltage: f64,
    /// Vehicle status as the protocol layer would report it.
    pub vehicle: VehicleStatus,
    relays: [bool; Relay::COUNT],
    indicators: [bool; Indicator::COUNT],
    output_writes: u64,
    watchdog_feeds: u64,
    charger: ChargerStatus,
    display: Option<TextDisplay>,
}

impl SimStation {
    pub fn new(with_display: bool) -> Self {
        Self {
            buttons: [false; Button::COUNT],
            pilot_voltage: PILOT_UNPLUGGED,
            output_voltage: 0.0,
            vehicle: VehicleStatus::default(),
            relays: [false; Relay::COUNT],
            indicators: [false; Indicator::COUNT],
            output_writes: 0,
            watchdog_feeds: 0,
            charger: ChargerStatus::default(),
            display: with_display.then(TextDisplay::default),
        }
    }

    pub fn press(&mut self, button: Button) {
        self.buttons[button.index()] = true;
    }

    pub fn release(&mut self, button: Button) {
        self.buttons[button.index()] = false;
    }

    pub fn relay(&self, relay: Relay) -> bool {
        self.relays[relay.index()]
    }

    pub fn indicator(&self, indicator: Indicator) -> bool {
        self.indicators[indicator.index()]
    }

    /// Total relay + indicator writes received.
    pub fn output_writes(&self) -> u64 {
        self.output_writes
    }

    pub fn watchdog_feeds(&self) -> u64 {
        self.watchdog_feeds
    }

    /// Last published charger status.
    pub fn charger(&self) -> &ChargerStatus {
        &self.charger
    }

    pub fn text_display(&self) -> Option<&TextDisplay> {
        self.display.as_ref()
    }
}

impl StationHal for SimStation {
    fn button_level(&mut self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    fn pilot_voltage(&mut self) -> f64 {
        self.pilot_voltage
    }

    fn output_voltage(&mut self) -> f64 {
        self.output_voltage
    }

    fn set_relay(&mut self, relay: Relay, closed: bool) {
        self.relays[relay.index()] = closed;
        self.output_writes += 1;
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.indicators[indicator.index()] = on;
        self.output_writes += 1;
    }

    fn feed_watchdog(&mut self) {
        self.watchdog_feeds += 1;
    }

    fn vehicle_status(&mut self) -> VehicleStatus {
        self.vehicle
    }

    fn publish_charger_status(&mut self, status: &ChargerStatus) {
        self.charger = *status;
    }

    fn display(&mut self) -> Option<&mut dyn Display> {
        self.display.as_mut().map(|d| d as &mut dyn Display)
    }
}

// ─── Vehicle ────────────────────────────────────────────────────────

/// Scripted vehicle: plug in, press start, charge to target SOC, unplug.
#[derive(Debug, Clone)]
pub struct VehicleModel {
    /// Tick the cable is plugged in.
    pub plug_at: u64,
    /// Tick the operator presses start.
    pub start_at: u64,
    /// Ticks the start button is held.
    pub press_ticks: u64,
    /// Ticks after reaching the target SOC before unplugging.
    pub unplug_delay: u64,
    /// Pack capacity [Ah].
    pub capacity_ah: f64,
    /// SOC at which the vehicle stops charging [%].
    pub target_soc: f64,
    /// Requested current [A]; may exceed the station limit.
    pub current_request: f64,
    soc: f64,
    tick: u64,
    finished_at: Option<u64>,
}

impl Default for VehicleModel {
    fn default() -> Self {
        Self {
            plug_at: 5,
            start_at: 10,
            press_ticks: 2,
            unplug_delay: 40,
            capacity_ah: 0.05,
            target_soc: 80.0,
            current_request: 16.0,
            soc: 40.0,
            tick: 0,
            finished_at: None,
        }
    }
}

impl VehicleModel {
    pub fn soc(&self) -> f64 {
        self.soc
    }

    /// Pack voltage as a function of SOC [V].
    fn pack_voltage(&self) -> f64 {
        90.0 + self.soc * 0.2
    }

    /// Update the station's inputs for the next tick. `dt` is the tick length [s].
    pub fn advance(&mut self, station: &mut SimStation, dt: f64) {
        let tick = self.tick;
        self.tick += 1;

        // Cable.
        let plugged = tick >= self.plug_at
            && self
                .finished_at
                .is_none_or(|t| tick < t + self.unplug_delay);
        station.pilot_voltage = if plugged {
            PILOT_PLUGGED
        } else {
            PILOT_UNPLUGGED
        };

        // Operator.
        if tick >= self.start_at && tick < self.start_at + self.press_ticks {
            station.press(Button::Start);
        } else {
            station.release(Button::Start);
        }

        // Energy flow while the contactor is closed.
        if station.relay(Relay::Main) {
            station.output_voltage = station.charger().output_voltage;
            let amps = station.charger().output_current;
            self.soc = (self.soc + amps * dt / (self.capacity_ah * 3600.0) * 100.0).min(100.0);
        } else {
            station.output_voltage = 0.0;
        }

        let full = self.soc >= self.target_soc;
        if full && self.finished_at.is_none() && station.relay(Relay::Main) {
            self.finished_at = Some(tick);
            debug!("vehicle: target SOC reached at tick {tick}");
        }

        station.vehicle = VehicleStatus {
            charging_enabled: plugged && !full,
            voltage_request: self.pack_voltage(),
            current_request: if full { 0.0 } else { self.current_request },
            state_of_charge: self.soc.round().clamp(0.0, 100.0) as u8,
            fault_flags: 0,
        };
        trace!("vehicle: tick={tick} soc={:.1}", self.soc);
    }
}
