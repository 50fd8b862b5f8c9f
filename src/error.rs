//! Error definitions for the cockpit
//!
//! Filtering (dead buttons, neutral dpads, dead-zone sticks) is normal
//! behavior and never shows up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CockpitError {
    /// No compatible device appeared within the discovery window
    #[error("No gamepad connected (waited {waited_ms}ms)")]
    NoDevice { waited_ms: u64 },

    /// Connect was requested for an id outside the enumerated list
    #[error("Not a valid gamepad id: {0}")]
    InvalidDeviceId(usize),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
