//! Intake of change reports: hostname validation and hand-off to the pending set.

pub mod hostname;
pub mod report;

pub use hostname::HostnameValidator;
pub use report::{Ingress, ReportOutcome};
