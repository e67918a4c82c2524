//! Error types for the notification daemon.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by daemon components.
#[derive(Debug, Error)]
pub enum RtcnError {
    /// Reported hostname does not match the configured format.
    #[error("unrecognized hostname format: '{0}'")]
    InvalidHostname(String),
    /// The remediation command could not be started.
    #[error("failed to spawn action: {0}")]
    ActionSpawn(String),
    /// The remediation command exited unsuccessfully (`None` when killed by a signal).
    #[error("action exited with status {}", .0.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ActionExit(Option<i32>),
    /// The remediation command outlived its configured timeout.
    #[error("action timed out after {0:?}")]
    ActionTimeout(Duration),
    /// The command descriptor cannot be turned into a program invocation.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    /// Configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Required environment variables are unset or blank.
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
