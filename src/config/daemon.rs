//! Daemon configuration structures.

use std::fmt::Write as _;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{JoinStrategy, RtcnError};

/// OS-level command to run when triggered.
pub const ENV_NCM_COMMAND: &str = "RTCND_NCM_COMMAND";
/// Older misspelling of [`ENV_NCM_COMMAND`], still honored.
pub const ENV_NCM_COMMAND_LEGACY: &str = "RTNCD_NCM_COMMAND";
/// Check interval in seconds.
pub const ENV_CHECK_INTERVAL: &str = "RTCND_CHECK_INTERVAL";
/// Allow-list pattern for hostnames.
pub const ENV_HOSTNAME_FORMAT: &str = "RTCND_HOSTNAME_FORMAT";
/// Log file path.
pub const ENV_LOG: &str = "RTCND_LOG";
/// Batch separator (optional).
pub const ENV_JOIN_SEPARATOR: &str = "RTCND_JOIN_SEPARATOR";
/// Sort the batch before joining (optional).
pub const ENV_JOIN_SORTED: &str = "RTCND_JOIN_SORTED";
/// HTTP listen address (optional).
pub const ENV_BIND: &str = "RTCND_BIND";
/// Action timeout in seconds (optional).
pub const ENV_ACTION_TIMEOUT: &str = "RTCND_ACTION_TIMEOUT";
/// Require the hostname format to match the whole hostname (optional).
pub const ENV_HOSTNAME_FULL_MATCH: &str = "RTCND_HOSTNAME_FULL_MATCH";

/// Variables that must be set and non-blank.
pub const REQUIRED_ENV: [&str; 4] = [
    ENV_NCM_COMMAND,
    ENV_CHECK_INTERVAL,
    ENV_HOSTNAME_FORMAT,
    ENV_LOG,
];

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

/// Root daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Command run with the joined batch appended, e.g. an Ansible wrapper.
    pub ncm_command: String,
    /// Seconds between checks of the pending set.
    pub check_interval_secs: u64,
    /// Regular expression a hostname must match, starting at its first character.
    pub hostname_format: String,
    /// Require `hostname_format` to match the entire hostname.
    #[serde(default)]
    pub hostname_full_match: bool,
    /// Append-only operational log.
    pub log_path: PathBuf,
    /// How batches are joined into the command argument.
    #[serde(default)]
    pub join: JoinStrategy,
    /// HTTP listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Kill the command after this many seconds.
    #[serde(default)]
    pub action_timeout_secs: Option<u64>,
}

impl DaemonConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Config`] naming the first invalid value.
    pub fn validate(&self) -> Result<(), RtcnError> {
        if self.ncm_command.trim().is_empty() {
            return Err(RtcnError::Config("ncm_command must not be empty".into()));
        }
        if self.check_interval_secs == 0 {
            return Err(RtcnError::Config(
                "check_interval_secs must be greater than 0".into(),
            ));
        }
        Regex::new(&self.hostname_format)
            .map_err(|e| RtcnError::Config(format!("hostname_format is not a valid regex: {e}")))?;
        if self.log_path.as_os_str().is_empty() {
            return Err(RtcnError::Config("log_path must not be empty".into()));
        }
        if self.join.separator.is_empty() {
            return Err(RtcnError::Config("join separator must not be empty".into()));
        }
        if self.action_timeout_secs == Some(0) {
            return Err(RtcnError::Config(
                "action_timeout_secs must be greater than 0".into(),
            ));
        }
        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| RtcnError::Config(format!("bind_addr `{}` invalid: {e}", self.bind_addr)))?;
        Ok(())
    }

    /// Interval between checks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Action timeout, if configured.
    #[must_use]
    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_secs.map(Duration::from_secs)
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Config`] on malformed JSON or invalid values.
    pub fn from_json_str(input: &str) -> Result<Self, RtcnError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| RtcnError::Config(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment and validate.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::MissingEnv`] listing every unset required
    /// variable, or [`RtcnError::Config`] for unparsable values.
    pub fn from_env() -> Result<Self, RtcnError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup and validate.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// See [`DaemonConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RtcnError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ncm_command = get(ENV_NCM_COMMAND).or_else(|| get(ENV_NCM_COMMAND_LEGACY));
        let interval = get(ENV_CHECK_INTERVAL);
        let hostname_format = get(ENV_HOSTNAME_FORMAT);
        let log_path = get(ENV_LOG);

        let missing: Vec<String> = [
            (ENV_NCM_COMMAND, ncm_command.is_none()),
            (ENV_CHECK_INTERVAL, interval.is_none()),
            (ENV_HOSTNAME_FORMAT, hostname_format.is_none()),
            (ENV_LOG, log_path.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key.to_string())
        .collect();

        let (Some(ncm_command), Some(interval), Some(hostname_format), Some(log_path)) =
            (ncm_command, interval, hostname_format, log_path)
        else {
            return Err(RtcnError::MissingEnv(missing));
        };

        let check_interval_secs = interval.trim().parse::<u64>().map_err(|e| {
            RtcnError::Config(format!("{ENV_CHECK_INTERVAL} must be whole seconds: {e}"))
        })?;

        let mut join = JoinStrategy::default();
        if let Some(separator) = lookup(ENV_JOIN_SEPARATOR).filter(|s| !s.is_empty()) {
            join.separator = separator;
        }
        if let Some(sorted) = get(ENV_JOIN_SORTED) {
            join.sorted = parse_flag(&sorted)
                .ok_or_else(|| RtcnError::Config(format!("{ENV_JOIN_SORTED} must be a boolean")))?;
        }

        let hostname_full_match = get(ENV_HOSTNAME_FULL_MATCH)
            .map(|v| {
                parse_flag(&v).ok_or_else(|| {
                    RtcnError::Config(format!("{ENV_HOSTNAME_FULL_MATCH} must be a boolean"))
                })
            })
            .transpose()?
            .unwrap_or(false);
        let action_timeout_secs = get(ENV_ACTION_TIMEOUT)
            .map(|v| {
                v.trim().parse::<u64>().map_err(|e| {
                    RtcnError::Config(format!("{ENV_ACTION_TIMEOUT} must be whole seconds: {e}"))
                })
            })
            .transpose()?;

        let cfg = Self {
            ncm_command,
            check_interval_secs,
            hostname_format,
            hostname_full_match,
            log_path: PathBuf::from(log_path),
            join,
            bind_addr: get(ENV_BIND).unwrap_or_else(default_bind_addr),
            action_timeout_secs,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Checklist of required variables, `[ ]` marking the missing ones.
#[must_use]
pub fn env_checklist(missing: &[String]) -> String {
    let mut out = String::from("rtcnd requires these environment variables to be set:\n");
    for key in REQUIRED_ENV {
        let mark = if missing.iter().any(|m| m == key) { ' ' } else { 'x' };
        let _ = writeln!(out, "[{mark}] {key}");
    }
    out
}
