//! Control unit errors.
//!
//! The cycle itself cannot fail: every fault condition is a session state.
//! Errors only come from startup (configuration, signal handler).

use evse_common::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CycleError {
    /// Station configuration rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shutdown signal handler could not be installed.
    #[error("signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}
