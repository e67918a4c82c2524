//! Handling of a single change report.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{build_log_event, AddResult, EventKind, PendingSet, SharedEventSink};

use super::HostnameValidator;

/// Outcome of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Hostname is now pending for the next check.
    Added,
    /// Hostname was already pending.
    AlreadyPending,
    /// Hostname failed format validation and was ignored.
    Rejected,
}

impl From<AddResult> for ReportOutcome {
    fn from(result: AddResult) -> Self {
        match result {
            AddResult::Inserted => Self::Added,
            AddResult::AlreadyPresent => Self::AlreadyPending,
        }
    }
}

/// Validates reports and feeds them into the pending set.
///
/// Cheap to clone; clones share the pending set and sink.
#[derive(Clone)]
pub struct Ingress {
    pending: Arc<PendingSet>,
    validator: HostnameValidator,
    sink: SharedEventSink,
}

impl Ingress {
    /// Create an ingress over `pending`.
    pub fn new(pending: Arc<PendingSet>, validator: HostnameValidator, sink: SharedEventSink) -> Self {
        Self {
            pending,
            validator,
            sink,
        }
    }

    /// Pending set this ingress feeds.
    pub fn pending(&self) -> &Arc<PendingSet> {
        &self.pending
    }

    /// Validate `raw`, add it to the pending set and log the outcome.
    pub fn report(&self, raw: &str) -> ReportOutcome {
        let host = match self.validator.validate(raw) {
            Ok(host) => host,
            Err(e) => {
                tracing::warn!("{}", e);
                self.record(
                    EventKind::HostRejected,
                    format!("ERROR! unrecognized hostname format, got string '{raw}', ignoring."),
                );
                return ReportOutcome::Rejected;
            }
        };

        let (result, current) = self.pending.add_with_snapshot(host);
        let (kind, message) = match result {
            AddResult::Inserted => (
                EventKind::HostAdded,
                format!(
                    "{host} not in host list for next check, adding. Current host list: {current:?}"
                ),
            ),
            AddResult::AlreadyPresent => (
                EventKind::HostAlreadyPending,
                format!(
                    "{host} already in host list for next check, ignoring. Current host list: {current:?}"
                ),
            ),
        };
        tracing::info!(pending = current.len(), "{}", message);
        self.record(kind, message);
        result.into()
    }

    fn record(&self, kind: EventKind, message: String) {
        self.sink.lock().record(build_log_event(kind, message));
    }
}
