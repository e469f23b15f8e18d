//! # EVSE Control Unit Library
//!
//! Tick-driven controller for a single DC charging station. Each cycle feeds
//! the watchdog, samples buttons and analog inputs, advances the charging
//! session state machine and pushes the resulting relay, lamp, charger
//! status and display updates back to the host.
//!
//! ## Layers
//!
//! 1. **input**: button edge latches and pilot band check
//! 2. **safety**: setpoint clamping and fault guards
//! 3. **state**: session state machine and output image
//! 4. **report**: rate-limited display rendering
//! 5. **cycle**: per-tick orchestration and pacing
//!
//! [`sim`] provides an in-memory host and a scripted vehicle.
//!
//! ## Zero-Allocation Cycle
//!
//! Session state, the output diff and display lines live in fixed-size
//! storage (`heapless`); a tick performs no heap allocation outside the
//! simulated host.

pub mod cycle;
pub mod error;
pub mod input;
pub mod report;
pub mod safety;
pub mod sim;
pub mod state;
