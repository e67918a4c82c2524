//! # rtcnd
//!
//! A realtime change notification daemon.
//!
//! A separate component, usually a syslog server, calls `PUT /devices/{hostname}`
//! whenever a device has probably changed its configuration. Reports are
//! deduplicated into a pending set; on a fixed interval, if anything is
//! pending, one external command (typically an Ansible playbook wrapper) is
//! run with every pending hostname joined into a single argument, and the set
//! is cleared.
//!
//! ## Core Problem Solved
//!
//! Configuration-management runs are expensive. A burst of syslog messages
//! from one change, or a maintenance window touching many devices, should
//! produce one batched run per interval rather than one run per message.
//!
//! ## Key Pieces
//!
//! - **`PendingSet`**: lock-guarded set with atomic add-if-absent and drain-and-clear
//! - **`Scheduler`**: the single background loop that drains and triggers
//! - **`Action`**: the external command, run without a shell
//! - **`Ingress`**: hostname allow-listing in front of the pending set
//! - **Event log**: append-only, timestamped operational log file
//!
//! ```rust,ignore
//! use rtcnd::builders::build_daemon;
//! use rtcnd::config::DaemonConfig;
//!
//! let config = DaemonConfig::from_env()?;
//! let daemon = build_daemon(&config)?;
//!
//! let (stop, shutdown) = tokio::sync::watch::channel(false);
//! daemon.serve(shutdown).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Pending-set accumulation and the periodic trigger cycle.
pub mod core;
/// Configuration models and environment loading.
pub mod config;
/// Builders to construct the daemon from configuration.
pub mod builders;
/// Report intake and hostname validation.
pub mod ingress;
/// HTTP surface and daemon composition.
pub mod runtime;
/// Shared utilities.
pub mod util;
