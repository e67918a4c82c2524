//! Builders to construct the daemon from configuration.

pub mod daemon_builder;

pub use daemon_builder::{build_daemon, build_daemon_with};
