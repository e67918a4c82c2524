//! HTTP surface and daemon composition.

pub mod api;
pub mod daemon;

pub use api::{health, router, Health, ReportResponse};
pub use daemon::Daemon;
