//! Error types for configuration, hosts and scenario replay.

use thiserror::Error;

/// Errors raised while loading or validating a [`DropdownConfig`](crate::DropdownConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Throttle window of zero would disable coalescing entirely
    #[error("Throttle interval must be at least 1ms")]
    ZeroThrottle,

    /// An explicit element id was empty
    #[error("Element id for the {role} must not be empty")]
    EmptyId {
        /// Which element the id belongs to
        role: &'static str,
    },
}

/// Errors raised by a host environment.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("No global window exists")]
    NoWindow,

    #[error("No document in window")]
    NoDocument,

    /// A JavaScript call failed
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Errors raised by the `dropdown-replay` tool.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// I/O error reading the scenario
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario JSON is malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scenario carries an invalid dropdown configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scenario has nothing to replay
    #[error("Scenario has no steps")]
    NoSteps,
}
