//! Station cycle: feed → sample → step → apply → publish → report.
//!
//! [`CycleRunner`] owns the host, the input sampler, the session and the
//! reporter, and runs one tick per [`CycleRunner::tick`]. The watchdog is
//! fed first on every tick, whatever the session does afterwards.
//!
//! [`CycleRunner::run`] paces ticks with `std::thread::sleep` at the
//! configured cycle time. An overrun is logged and counted, never fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use evse_common::config::StationConfig;
use evse_common::station::StationHal;
use tracing::{debug, info, trace, warn};

use crate::error::CycleError;
use crate::input::sampler::{InputSampler, PilotBand};
use crate::report::StatusReporter;
use crate::state::outputs::{OutputChange, OutputImage};
use crate::state::session::{Session, StepOutcome};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Cycles that took longer than the cycle time.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

pub struct CycleRunner<H: StationHal> {
    hal: H,
    sampler: InputSampler,
    session: Session,
    reporter: StatusReporter,
    /// Output image last pushed to the host.
    applied: Option<OutputImage>,
    stats: CycleStats,
    cycle_time: Duration,
    ticks: u64,
}

impl<H: StationHal> CycleRunner<H> {
    /// Validate `config`, show the boot screen and drive the initial IDLE outputs.
    pub fn new(config: &StationConfig, hal: H) -> Result<Self, CycleError> {
        config.validate()?;

        let mut runner = Self {
            hal,
            sampler: InputSampler::new(PilotBand::from(&config.pilot)),
            session: Session::new(config),
            reporter: StatusReporter::new(config.timing.display_interval),
            applied: None,
            stats: CycleStats::new(),
            cycle_time: Duration::from_millis(config.timing.cycle_time_ms),
            ticks: 0,
        };

        runner.reporter.splash(runner.hal.display());
        runner.apply_outputs();
        runner.hal.publish_charger_status(runner.session.charger_status());

        info!(
            "Station ready: max {:.1}V / {:.1}A, cycle {}ms",
            config.limits.max_voltage, config.limits.max_current, config.timing.cycle_time_ms
        );
        Ok(runner)
    }

    /// Run one tick.
    pub fn tick(&mut self) -> StepOutcome {
        self.hal.feed_watchdog();

        let inputs = self.sampler.sample(&mut self.hal);
        let vehicle = self.hal.vehicle_status();
        let outcome = self.session.step(&inputs, &vehicle);
        trace!(
            "tick {}: {} t={} pilot={:.1}V",
            self.ticks,
            outcome.current.phase(),
            self.session.state_timer(),
            inputs.pilot_voltage
        );
        if outcome.transitioned() {
            info!("{} -> {}", outcome.previous.phase(), outcome.current.phase());
        }

        self.apply_outputs();
        self.hal.publish_charger_status(self.session.charger_status());

        let force = outcome.entered_fault().is_some();
        self.reporter
            .report(self.hal.display(), &self.session, &inputs, &vehicle, force);

        self.ticks += 1;
        outcome
    }

    /// Push relay and indicator levels that changed since the last apply.
    fn apply_outputs(&mut self) {
        let image = *self.session.outputs();
        for change in image.changes_since(self.applied.as_ref()) {
            match change {
                OutputChange::Relay(relay, closed) => {
                    debug!("relay {} -> {}", relay.name(), if closed { "closed" } else { "open" });
                    self.hal.set_relay(relay, closed);
                }
                OutputChange::Indicator(indicator, on) => {
                    debug!("lamp {} -> {}", indicator.name(), if on { "on" } else { "off" });
                    self.hal.set_indicator(indicator, on);
                }
            }
        }
        self.applied = Some(image);
    }

    /// Paced loop. Stops when `running` clears or after `max_ticks`.
    ///
    /// `before_tick` runs ahead of each tick with the host and tick index,
    /// which is where a simulated plant updates its inputs.
    pub fn run<F>(&mut self, running: &AtomicBool, max_ticks: Option<u64>, mut before_tick: F) -> u64
    where
        F: FnMut(&mut H, u64),
    {
        let start = self.ticks;
        let budget_ns = self.cycle_time.as_nanos() as u64;

        while running.load(Ordering::SeqCst) {
            let done = self.ticks - start;
            if max_ticks.is_some_and(|max| done >= max) {
                break;
            }

            let cycle_start = Instant::now();
            before_tick(&mut self.hal, self.ticks);
            self.tick();

            let elapsed = cycle_start.elapsed();
            let duration_ns = elapsed.as_nanos() as u64;
            self.stats.record(duration_ns);
            if duration_ns > budget_ns {
                self.stats.overruns += 1;
                warn!("cycle overrun: {duration_ns}ns > {budget_ns}ns budget");
            }

            if let Some(remaining) = self.cycle_time.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        let ran = self.ticks - start;
        info!(
            "Loop stopped after {ran} ticks (avg {}ns, max {}ns, overruns {})",
            self.stats.avg_cycle_ns(),
            self.stats.max_cycle_ns,
            self.stats.overruns
        );
        ran
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn hal(&self) -> &H {
        &self.hal
    }

    #[inline]
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Ticks executed since construction.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames drawn, boot screen included.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.reporter.frames()
    }
}
