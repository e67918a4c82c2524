//! Event sink implementations.
//!
//! Provides the append-only log file the daemon writes its operational
//! history to, plus an in-memory sink for testing.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::core::RtcnError;

/// What a log event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Hostname was added to the pending set.
    HostAdded,
    /// Hostname was already pending.
    HostAlreadyPending,
    /// Hostname was rejected by format validation.
    HostRejected,
    /// A batch was drained and the action is about to run.
    Triggered,
    /// The action finished successfully.
    ActionSucceeded,
    /// The action failed to spawn, exited non-zero or timed out.
    ActionFailed,
}

/// One line of the operational log.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Event identifier.
    pub event_id: String,
    /// Event kind.
    pub kind: EventKind,
    /// Local wall-clock time the event was built.
    pub created_at: DateTime<Local>,
    /// Human-readable message.
    pub message: String,
}

impl LogEvent {
    /// Render as `"<iso timestamp>: <message>"` without a trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}: {}",
            self.created_at.format("%Y-%m-%dT%H:%M:%S%.6f"),
            self.message
        )
    }
}

/// Helper to build a log event stamped with the current time.
pub fn build_log_event(kind: EventKind, message: impl Into<String>) -> LogEvent {
    LogEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        kind,
        created_at: Local::now(),
        message: message.into(),
    }
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, event: LogEvent);
}

/// Sink shared between ingress and the scheduler.
pub type SharedEventSink = Arc<Mutex<Box<dyn EventSink>>>;

/// Wrap a sink for sharing.
pub fn shared_sink(sink: impl EventSink + 'static) -> SharedEventSink {
    Arc::new(Mutex::new(Box::new(sink)))
}

/// In-memory event sink for testing and dev.
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<LogEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events))),
            max_events,
        }
    }

    /// Handle for reading events after the sink has been boxed and shared.
    pub fn reader(&self) -> InMemoryEventReader {
        InMemoryEventReader {
            events: Arc::clone(&self.events),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: LogEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Read side of an [`InMemoryEventSink`].
#[derive(Clone)]
pub struct InMemoryEventReader {
    events: Arc<Mutex<VecDeque<LogEvent>>>,
}

impl InMemoryEventReader {
    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events of one kind.
    pub fn of_kind(&self, kind: EventKind) -> Vec<LogEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

/// Append-only log file sink.
///
/// `record` only formats the line and queues it; a dedicated writer thread
/// owns the file, so a slow disk never stalls the callers holding the
/// shared sink lock. Dropping the sink flushes every queued line before
/// returning.
pub struct FileEventSink {
    path: PathBuf,
    lines: Option<mpsc::UnboundedSender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl FileEventSink {
    /// Open `path` for appending, creating it if missing, and start the
    /// writer thread.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Io`] when the file cannot be opened or the
    /// writer thread cannot be spawned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RtcnError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = thread::Builder::new()
            .name("rtcnd-log-writer".into())
            .spawn({
                let path = path.clone();
                move || write_lines(&path, file, rx)
            })?;
        Ok(Self {
            path,
            lines: Some(tx),
            writer: Some(writer),
        })
    }

    /// Path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_lines(path: &Path, mut file: File, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.blocking_recv() {
        if let Err(e) = writeln!(file, "{line}") {
            tracing::error!("failed to write log file {}: {}", path.display(), e);
        }
    }
}

impl EventSink for FileEventSink {
    fn record(&mut self, event: LogEvent) {
        let sent = self
            .lines
            .as_ref()
            .is_some_and(|tx| tx.send(event.to_line()).is_ok());
        if !sent {
            tracing::error!(
                "log writer for {} has stopped, dropping: {}",
                self.path.display(),
                event.message
            );
        }
    }
}

impl Drop for FileEventSink {
    fn drop(&mut self) {
        drop(self.lines.take());
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::error!("log writer for {} panicked", self.path.display());
            }
        }
    }
}
