//! Configuration models for the daemon.

pub mod daemon;

pub use daemon::{env_checklist, DaemonConfig, REQUIRED_ENV};
