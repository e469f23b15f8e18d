//! State machine module root.
//!
//! The charging session state machine and the output image it drives.

pub mod outputs;
pub mod session;
