//! Status reporter: rate-limited, read-only rendering to the optional display.
//!
//! Renders when `state_timer % interval == 0`, or immediately on the cycle
//! a fault is entered. That forced frame carries the fault reason;
//! periodic frames in a fault state show the pilot voltage like every
//! other non-charging state. It only ever borrows the session immutably.

use core::fmt::Write;

use evse_common::consts::DISPLAY_LINE_LEN;
use evse_common::session::SessionState;
use evse_common::station::{Display, VehicleStatus};

use crate::input::sampler::CycleInputs;
use crate::state::session::Session;

/// One display line.
pub type Line = heapless::String<DISPLAY_LINE_LEN>;

/// Baselines of the three text rows [px].
const ROW_Y: [u8; 3] = [10, 25, 40];

/// `fmt::Write` adapter that keeps whole characters up to the line
/// capacity and silently drops the rest.
struct Truncating<'a>(&'a mut Line);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Composed screen content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFrame {
    pub lines: heapless::Vec<Line, 3>,
}

impl StatusFrame {
    fn push(&mut self, args: core::fmt::Arguments<'_>) {
        let mut line = Line::new();
        let _ = Truncating(&mut line).write_fmt(args);
        let _ = self.lines.push(line);
    }

    /// Compose the frame for the current session state. `fault_entry`
    /// selects the reason line for the frame drawn as a fault is entered.
    pub fn compose(
        session: &Session,
        inputs: &CycleInputs,
        vehicle: &VehicleStatus,
        fault_entry: bool,
    ) -> Self {
        let mut frame = Self::default();
        let state = session.state();
        frame.push(format_args!("{}", state.phase()));

        match state {
            SessionState::Charging => {
                frame.push(format_args!(
                    "{:.1}V  {:.1}A",
                    inputs.output_voltage,
                    session.setpoint().current
                ));
                frame.push(format_args!("SOC: {}%", vehicle.state_of_charge));
            }
            SessionState::Faulted(fault) if fault_entry => {
                frame.push(format_args!("{}", fault.reason()));
            }
            _ => {
                frame.push(format_args!("CP: {:.1}V", inputs.pilot_voltage));
            }
        }
        frame
    }

    /// Draw onto a display and push it.
    pub fn draw(&self, display: &mut dyn Display) {
        display.clear();
        for (line, y) in self.lines.iter().zip(ROW_Y) {
            display.draw_text(0, y, line.as_str());
        }
        display.update();
    }
}

#[derive(Debug, Clone)]
pub struct StatusReporter {
    interval: u32,
    frames: u64,
}

impl StatusReporter {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
        }
    }

    #[inline]
    pub fn is_due(&self, state_timer: u32) -> bool {
        state_timer % self.interval == 0
    }

    /// Frames drawn so far.
    #[inline]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Boot screen.
    pub fn splash(&mut self, display: Option<&mut dyn Display>) {
        if let Some(display) = display {
            display.clear();
            display.draw_text(0, 12, "TES Charger V3");
            display.draw_text(0, 24, "Initializing...");
            display.update();
            self.frames += 1;
        }
    }

    /// Render if due or forced (fault entry). Returns whether a frame was drawn.
    pub fn report(
        &mut self,
        display: Option<&mut dyn Display>,
        session: &Session,
        inputs: &CycleInputs,
        vehicle: &VehicleStatus,
        force: bool,
    ) -> bool {
        let Some(display) = display else {
            return false;
        };
        if !force && !self.is_due(session.state_timer()) {
            return false;
        }
        StatusFrame::compose(session, inputs, vehicle, force).draw(display);
        self.frames += 1;
        true
    }
}
