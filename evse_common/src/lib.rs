//! EVSE Common Library
//!
//! Shared constants, channel identifiers, session types, host contracts
//! and configuration loading for the EVSE workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Default limits and session timing
//! - [`channel`] - Button, relay and indicator identifiers
//! - [`session`] - Session state, phase and fault types
//! - [`station`] - Host traits and vehicle/charger status records
//! - [`config`] - Station configuration and TOML loading
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use evse_common::prelude::*;
//!
//! let config = StationConfig::default();
//! assert_eq!(config.limits.max_voltage, MAX_VOLTAGE);
//! ```

pub mod channel;
pub mod config;
pub mod consts;
pub mod prelude;
pub mod session;
pub mod station;
