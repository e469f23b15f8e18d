//! Safety module root.
//!
//! Setpoint limiting against the station maxima and the fault guards
//! evaluated every cycle ahead of the session's own exit conditions.

pub mod guards;
pub mod limiter;
