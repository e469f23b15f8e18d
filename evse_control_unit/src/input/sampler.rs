//! Per-cycle input sampling.
//!
//! One [`EdgeDetector`] per [`Button`], and the control-pilot band check.

use evse_common::channel::Button;
use evse_common::config::PilotConfig;
use evse_common::station::StationHal;
use tracing::trace;

use super::edge::EdgeDetector;

/// Control-pilot band meaning "vehicle connected". Both bounds exclusive, no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotBand {
    min: f64,
    max: f64,
}

impl PilotBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn connected(&self, pilot_voltage: f64) -> bool {
        self.min < pilot_voltage && pilot_voltage < self.max
    }
}

impl From<&PilotConfig> for PilotBand {
    fn from(cfg: &PilotConfig) -> Self {
        Self::new(cfg.connected_min, cfg.connected_max)
    }
}

/// Events and readings for one cycle. Consumed once by the session step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleInputs {
    /// Rising edge per button, indexed by [`Button::index`].
    pub edges: [bool; Button::COUNT],
    /// Pilot inside the connected band this cycle.
    pub connected: bool,
    /// Raw control-pilot voltage [V].
    pub pilot_voltage: f64,
    /// Measured DC output voltage [V].
    pub output_voltage: f64,
}

impl CycleInputs {
    #[inline]
    pub const fn edge(&self, button: Button) -> bool {
        self.edges[button.index()]
    }

    /// Builder used by tests and benchmarks.
    pub const fn with_edge(mut self, button: Button) -> Self {
        self.edges[button.index()] = true;
        self
    }
}

/// Samples the host once per cycle.
#[derive(Debug, Clone)]
pub struct InputSampler {
    band: PilotBand,
    detectors: [EdgeDetector; Button::COUNT],
}

impl InputSampler {
    pub fn new(band: PilotBand) -> Self {
        Self {
            band,
            detectors: [EdgeDetector::new(); Button::COUNT],
        }
    }

    /// Read every button and analog input from the host.
    pub fn sample<H: StationHal + ?Sized>(&mut self, hal: &mut H) -> CycleInputs {
        let mut edges = [false; Button::COUNT];
        for button in Button::ALL {
            let level = hal.button_level(button);
            let edge = self.detectors[button.index()].update(level);
            if edge {
                trace!("button {} pressed", button.name());
            }
            edges[button.index()] = edge;
        }

        let pilot_voltage = hal.pilot_voltage();
        let output_voltage = hal.output_voltage();

        CycleInputs {
            edges,
            connected: self.band.connected(pilot_voltage),
            pilot_voltage,
            output_voltage,
        }
    }

    /// Latch state per button.
    pub fn latches(&self) -> [bool; Button::COUNT] {
        self.detectors.map(|d| d.is_latched())
    }
}
