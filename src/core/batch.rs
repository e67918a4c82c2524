//! Drained batches and how they are rendered for the action.

use serde::{Deserialize, Serialize};

/// Hostnames captured by one drain of the pending set.
///
/// Order is whatever the drain produced; it carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    hosts: Vec<String>,
}

impl Batch {
    /// Wrap drained hostnames.
    #[must_use]
    pub const fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    /// Number of hostnames in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the batch holds no hostnames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Whether `host` was drained into this batch.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    /// Borrow the hostnames.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Consume the batch, returning the hostnames.
    #[must_use]
    pub fn into_hosts(self) -> Vec<String> {
        self.hosts
    }
}

/// How a batch is joined into the single action argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinStrategy {
    /// Placed between hostnames.
    pub separator: String,
    /// Sort hostnames before joining, giving a stable argument.
    pub sorted: bool,
}

impl Default for JoinStrategy {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            sorted: false,
        }
    }
}

impl JoinStrategy {
    /// Comma separated, drain order.
    #[must_use]
    pub fn comma() -> Self {
        Self::default()
    }

    /// Use `separator` instead of a comma.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sort hostnames before joining.
    #[must_use]
    pub const fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Render `batch` as one argument string.
    #[must_use]
    pub fn render(&self, batch: &Batch) -> String {
        if self.sorted {
            let mut hosts: Vec<&str> = batch.hosts().iter().map(String::as_str).collect();
            hosts.sort_unstable();
            hosts.join(&self.separator)
        } else {
            batch.hosts().join(&self.separator)
        }
    }
}
