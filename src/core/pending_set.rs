//! Deduplicating set of hostnames awaiting the next trigger.
//!
//! Every operation takes the single `parking_lot::Mutex` for its whole
//! duration, so check-and-insert and drain-and-clear are atomic with respect
//! to each other. The guard is never returned to callers and never held
//! across an `.await`.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::batch::Batch;

/// Outcome of [`PendingSet::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// The hostname was not pending and has been added.
    Inserted,
    /// The hostname was already pending; nothing changed.
    AlreadyPresent,
}

impl AddResult {
    /// Whether this call added the hostname.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Hostnames reported as possibly changed since the last trigger.
///
/// ```
/// use rtcnd::core::{AddResult, PendingSet};
///
/// let pending = PendingSet::new();
/// assert_eq!(pending.add("ABC1DEF23"), AddResult::Inserted);
/// assert_eq!(pending.add("ABC1DEF23"), AddResult::AlreadyPresent);
///
/// let batch = pending.drain_if_non_empty().expect("one host pending");
/// assert_eq!(batch.len(), 1);
/// assert!(pending.drain_if_non_empty().is_none());
/// ```
#[derive(Debug, Default)]
pub struct PendingSet {
    hosts: Mutex<HashSet<String>>,
}

impl PendingSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hostname if it is not already pending.
    ///
    /// The caller is responsible for validating the hostname; the set does
    /// not inspect its format.
    pub fn add(&self, host: impl Into<String>) -> AddResult {
        let host = host.into();
        debug_assert!(!host.is_empty(), "hostnames are validated before add");
        if self.hosts.lock().insert(host) {
            AddResult::Inserted
        } else {
            AddResult::AlreadyPresent
        }
    }

    /// Add a hostname like [`PendingSet::add`] and return a sorted copy of
    /// the set taken under the same lock acquisition.
    ///
    /// The snapshot always includes `host`, even when a drain runs
    /// concurrently.
    pub fn add_with_snapshot(&self, host: impl Into<String>) -> (AddResult, Vec<String>) {
        let host = host.into();
        debug_assert!(!host.is_empty(), "hostnames are validated before add");
        let mut hosts = self.hosts.lock();
        let result = if hosts.insert(host) {
            AddResult::Inserted
        } else {
            AddResult::AlreadyPresent
        };
        let mut snapshot: Vec<String> = hosts.iter().cloned().collect();
        drop(hosts);
        snapshot.sort_unstable();
        (result, snapshot)
    }

    /// Take every pending hostname and leave the set empty.
    ///
    /// Returns `None` without touching the set when nothing is pending.
    pub fn drain_if_non_empty(&self) -> Option<Batch> {
        let mut hosts = self.hosts.lock();
        if hosts.is_empty() {
            return None;
        }
        let drained = std::mem::take(&mut *hosts);
        drop(hosts);
        Some(Batch::new(drained.into_iter().collect()))
    }

    /// Number of pending hostnames.
    pub fn len(&self) -> usize {
        self.hosts.lock().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.hosts.lock().is_empty()
    }

    /// Whether `host` is pending.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.lock().contains(host)
    }

    /// Sorted copy of the pending hostnames.
    pub fn snapshot(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.hosts.lock().iter().cloned().collect();
        hosts.sort_unstable();
        hosts
    }
}
