//! Remediation action invoked with each drained batch.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use super::RtcnError;

/// Result of a successful action run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Exit code, when the platform reports one.
    pub exit_code: Option<i32>,
    /// Wall-clock time the action took.
    pub duration: Duration,
}

/// Abstraction for the external process run on each trigger.
///
/// The scheduler awaits `invoke` inside its own task, so a slow action
/// delays the next drain but never blocks anyone adding hosts.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use rtcnd::core::{Action, ActionReport, RtcnError};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Action for Echo {
///     async fn invoke(&self, argument: &str) -> Result<ActionReport, RtcnError> {
///         println!("{argument}");
///         Ok(ActionReport { exit_code: Some(0), duration: Default::default() })
///     }
///
///     fn describe(&self) -> String {
///         "echo".into()
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Run the action with the joined batch as its argument.
    ///
    /// # Errors
    ///
    /// Returns an error when the action cannot start, exits unsuccessfully
    /// or times out. The scheduler logs it and carries on.
    async fn invoke(&self, argument: &str) -> Result<ActionReport, RtcnError>;

    /// Short description used in log lines.
    fn describe(&self) -> String;
}

/// Runs a configured OS command with the batch appended as one argument.
///
/// No shell is involved: the descriptor is split on whitespace into the
/// program and its leading arguments.
#[derive(Debug, Clone)]
pub struct CommandAction {
    descriptor: String,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandAction {
    /// Parse a command descriptor such as `sudo -u ansible /usr/local/sbin/ansible_ncm.sh`.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::InvalidCommand`] when the descriptor is blank.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, RtcnError> {
        let mut parts = descriptor.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| RtcnError::InvalidCommand("command is empty".into()))?;
        Ok(Self {
            descriptor: descriptor.trim().to_string(),
            program,
            args: parts.collect(),
            timeout: None,
        })
    }

    /// Kill the command if it runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program that will be executed.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the batch argument.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Action for CommandAction {
    async fn invoke(&self, argument: &str) -> Result<ActionReport, RtcnError> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(argument)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RtcnError::ActionSpawn(format!("'{}': {e}", self.program)))?;

        let status = match self.timeout {
            Some(limit) => {
                if let Ok(status) = tokio::time::timeout(limit, child.wait()).await {
                    status?
                } else {
                    if let Err(e) = child.kill().await {
                        tracing::warn!("failed to kill timed out action: {}", e);
                    }
                    return Err(RtcnError::ActionTimeout(limit));
                }
            }
            None => child.wait().await?,
        };

        if !status.success() {
            return Err(RtcnError::ActionExit(status.code()));
        }
        Ok(ActionReport {
            exit_code: status.code(),
            duration: start.elapsed(),
        })
    }

    fn describe(&self) -> String {
        self.descriptor.clone()
    }
}
